//! Object and sketch store
//!
//! Both collections are unique by id and keep insertion order, which is the
//! order used for listing and export.

use shaper_cad::{CadKernel, Sketch};
use uuid::Uuid;

use crate::object::{ObjectKind, ObjectRecord, RecordOptions, RestoreError, SceneObject};

/// An object dropped while restoring
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedObject {
    pub id: Uuid,
    pub kind: ObjectKind,
    pub error: RestoreError,
}

/// Outcome of [`SceneStore::restore`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestoreReport {
    /// Number of objects rebuilt
    pub restored: usize,
    /// Objects that could not be rebuilt
    pub skipped: Vec<SkippedObject>,
}

impl RestoreReport {
    /// True if every record was rebuilt
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// In-memory scene contents
#[derive(Debug, Clone, Default)]
pub struct SceneStore {
    objects: Vec<SceneObject>,
    sketches: Vec<Sketch>,
}

impl SceneStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    // ============== Object Accessors ==============

    /// Add an object, replacing (in place) any object with the same id
    ///
    /// Returns the replaced object.
    pub fn add_object(&mut self, object: SceneObject) -> Option<SceneObject> {
        match self.objects.iter_mut().find(|o| o.id == object.id) {
            Some(slot) => Some(std::mem::replace(slot, object)),
            None => {
                self.objects.push(object);
                None
            }
        }
    }

    /// Remove an object by ID
    pub fn remove_object(&mut self, id: Uuid) -> Option<SceneObject> {
        let index = self.objects.iter().position(|o| o.id == id)?;
        Some(self.objects.remove(index))
    }

    /// Get an object by ID
    pub fn get_object(&self, id: Uuid) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Get a mutable object by ID
    pub fn get_object_mut(&mut self, id: Uuid) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    /// Objects in insertion order
    pub fn list_objects(&self) -> &[SceneObject] {
        &self.objects
    }

    // ============== Sketch Accessors ==============

    /// Add a finished sketch, replacing (in place) any sketch with the same id
    pub fn add_sketch(&mut self, sketch: Sketch) -> Option<Sketch> {
        match self.sketches.iter_mut().find(|s| s.id() == sketch.id()) {
            Some(slot) => Some(std::mem::replace(slot, sketch)),
            None => {
                self.sketches.push(sketch);
                None
            }
        }
    }

    /// Remove a sketch by ID
    pub fn remove_sketch(&mut self, id: Uuid) -> Option<Sketch> {
        let index = self.sketches.iter().position(|s| s.id() == id)?;
        Some(self.sketches.remove(index))
    }

    /// Get a sketch by ID
    pub fn get_sketch(&self, id: Uuid) -> Option<&Sketch> {
        self.sketches.iter().find(|s| s.id() == id)
    }

    /// Sketches in insertion order
    pub fn list_sketches(&self) -> &[Sketch] {
        &self.sketches
    }

    // ============== Whole-store Operations ==============

    /// True if there are no objects and no sketches
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.sketches.is_empty()
    }

    /// Empty both collections, returning the removed objects
    pub fn clear_all(&mut self) -> Vec<SceneObject> {
        self.sketches.clear();
        std::mem::take(&mut self.objects)
    }

    /// Export records for every object, in order
    pub fn records(&self, options: RecordOptions) -> Vec<ObjectRecord> {
        self.objects.iter().map(|o| o.to_record(options)).collect()
    }

    /// Replace the whole store from records and sketches
    ///
    /// Solids of the previous objects are released. Records that cannot be
    /// rebuilt are skipped and reported; they never abort the restore.
    pub fn restore(
        &mut self,
        records: &[ObjectRecord],
        sketches: Vec<Sketch>,
        kernel: &dyn CadKernel,
    ) -> RestoreReport {
        for object in self.clear_all() {
            if let Some(solid) = &object.solid {
                kernel.release(solid);
            }
        }

        let mut report = RestoreReport::default();
        for record in records {
            match record.to_object(kernel) {
                Ok(object) => {
                    if let Some(old) = self.add_object(object) {
                        if let Some(solid) = &old.solid {
                            kernel.release(solid);
                        }
                    }
                    report.restored += 1;
                }
                Err(error) => {
                    tracing::warn!("Skipping {} object {}: {}", record.kind.name(), record.id, error);
                    report.skipped.push(SkippedObject {
                        id: record.id,
                        kind: record.kind,
                        error,
                    });
                }
            }
        }

        for sketch in sketches {
            self.add_sketch(sketch);
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::PrimitiveKind;
    use glam::Vec3;
    use shaper_cad::{ExtrudeSettings, MeshKernel, Point2D, extrude_sketch};

    fn extruded(kernel: &MeshKernel) -> SceneObject {
        let sketch = Sketch::circle(Point2D::ORIGIN, 1.0);
        let solid = extrude_sketch(&sketch, 2.0, kernel, &ExtrudeSettings::default()).unwrap();
        SceneObject::extruded(solid)
    }

    #[test]
    fn test_insertion_order_and_replace() {
        let mut store = SceneStore::new();
        let a = SceneObject::primitive(PrimitiveKind::Box, Vec3::ZERO);
        let b = SceneObject::primitive(PrimitiveKind::Sphere, Vec3::ZERO);
        store.add_object(a.clone());
        store.add_object(b.clone());

        let mut moved = a.clone();
        moved.transform.position = Vec3::X;
        assert_eq!(store.add_object(moved), Some(a.clone()));

        let ids: Vec<_> = store.list_objects().iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
        assert_eq!(store.get_object(a.id).unwrap().transform.position, Vec3::X);
    }

    #[test]
    fn test_remove() {
        let mut store = SceneStore::new();
        let object = SceneObject::primitive(PrimitiveKind::Box, Vec3::ZERO);
        let sketch = Sketch::circle(Point2D::ORIGIN, 2.0);
        store.add_object(object.clone());
        store.add_sketch(sketch.clone());

        assert_eq!(store.remove_object(object.id), Some(object.clone()));
        assert_eq!(store.remove_object(object.id), None);
        assert_eq!(store.remove_sketch(sketch.id()), Some(sketch));
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear_all_empties_both() {
        let mut store = SceneStore::new();
        store.add_object(SceneObject::primitive(PrimitiveKind::Box, Vec3::ZERO));
        store.add_sketch(Sketch::circle(Point2D::ORIGIN, 2.0));

        let removed = store.clear_all();
        assert_eq!(removed.len(), 1);
        assert!(store.list_objects().is_empty());
        assert!(store.list_sketches().is_empty());
    }

    #[test]
    fn test_restore_skips_extruded_without_source() {
        let kernel = MeshKernel::new();
        let mut store = SceneStore::new();
        let cube = SceneObject::primitive(PrimitiveKind::Box, Vec3::ONE);
        let solid = extruded(&kernel);
        store.add_object(cube.clone());
        store.add_object(solid.clone());
        store.add_sketch(Sketch::circle(Point2D::ORIGIN, 1.0));

        let records = store.records(RecordOptions::default());
        let sketches = store.list_sketches().to_vec();
        let report = store.restore(&records, sketches, &kernel);

        assert_eq!(report.restored, 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].id, solid.id);
        assert_eq!(
            report.skipped[0].error,
            RestoreError::UnreconstructableObject(solid.id)
        );
        assert_eq!(store.list_objects(), &[cube]);
        assert_eq!(store.list_sketches().len(), 1);
        // The dropped object's solid was released
        assert_eq!(kernel.solid_count(), 0);
    }

    #[test]
    fn test_restore_rebuilds_persisted_extrusions() {
        let kernel = MeshKernel::new();
        let mut store = SceneStore::new();
        let solid = extruded(&kernel);
        store.add_object(solid.clone());

        let records = store.records(RecordOptions {
            persist_extrusions: true,
        });
        let report = store.restore(&records, Vec::new(), &kernel);

        assert!(report.is_complete());
        let restored = store.get_object(solid.id).unwrap();
        assert_eq!(restored.extrusion, solid.extrusion);
        assert_eq!(kernel.solid_count(), 1);
    }
}
