//! CPU-side mesh bookkeeping, kept free of GL calls so it can be tested on
//! its own. [`GeometryBatch`](super::geometry_batch::GeometryBatch) owns the
//! buffer objects that back these records.

use std::sync::atomic::{AtomicU32, Ordering};

use thiserror::Error;

static NEXT_GENERATION: AtomicU32 = AtomicU32::new(1);

/// Opaque reference to a mesh inside one [`MeshArena`]. Handles remember
/// which arena minted them; presenting one to a different arena is an error
/// instead of a silent lookup of an unrelated record.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MeshHandle {
    index: u32,
    generation: u32,
}

impl MeshHandle {
    /// Position of the record: sequential from 0 in insertion order.
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("mesh handle {} was minted by a different arena", .handle.index())]
    StaleHandle { handle: MeshHandle },
    #[error("GL allocation failed: {0}")]
    Allocation(String),
}

/// One GL vertex attribute: shader location, component count, GL type enum,
/// normalization flag, byte stride and byte offset. Nothing checks the
/// descriptor against the vertex layout; the caller owns consistency.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VertexAttribute {
    pub location: u32,
    pub count: i32,
    pub data_type: u32,
    pub normalized: bool,
    pub stride: i32,
    pub offset: i32,
}

/// CPU copy of one mesh: raw vertex floats, optional indices and the
/// attribute descriptors applied at upload.
#[derive(Debug, Default, Clone)]
pub struct MeshRecord {
    pub vertices: Vec<f32>,
    pub indices: Vec<i32>,
    pub indexed: bool,
    pub attributes: Vec<VertexAttribute>,
}

/// Growable collection of mesh records. Records are only added, never
/// removed; teardown happens with the owning batch.
#[derive(Debug)]
pub struct MeshArena {
    generation: u32,
    records: Vec<MeshRecord>,
}

impl MeshArena {
    pub fn new() -> Self {
        Self {
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
            records: Vec::new(),
        }
    }

    /// Registers a non-indexed mesh and returns its handle.
    pub fn create_mesh(&mut self, vertices: Vec<f32>) -> MeshHandle {
        self.push(MeshRecord {
            vertices,
            indices: Vec::new(),
            indexed: false,
            attributes: Vec::new(),
        })
    }

    /// Registers an indexed mesh and returns its handle.
    pub fn create_indexed_mesh(&mut self, vertices: Vec<f32>, indices: Vec<i32>) -> MeshHandle {
        self.push(MeshRecord {
            vertices,
            indices,
            indexed: true,
            attributes: Vec::new(),
        })
    }

    fn push(&mut self, record: MeshRecord) -> MeshHandle {
        let handle = MeshHandle {
            index: self.records.len() as u32,
            generation: self.generation,
        };
        self.records.push(record);
        handle
    }

    /// Appends an attribute descriptor to the record behind `handle`.
    pub fn add_attribute(
        &mut self,
        handle: MeshHandle,
        attribute: VertexAttribute,
    ) -> Result<(), GeometryError> {
        self.get_mut(handle)?.attributes.push(attribute);
        Ok(())
    }

    pub fn get(&self, handle: MeshHandle) -> Result<&MeshRecord, GeometryError> {
        self.check(handle)?;
        Ok(&self.records[handle.index()])
    }

    pub fn get_mut(&mut self, handle: MeshHandle) -> Result<&mut MeshRecord, GeometryError> {
        self.check(handle)?;
        Ok(&mut self.records[handle.index()])
    }

    // Handles are only minted here and records never leave, so a matching
    // generation implies a valid index.
    fn check(&self, handle: MeshHandle) -> Result<(), GeometryError> {
        if handle.generation != self.generation {
            return Err(GeometryError::StaleHandle { handle });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order, paired with their slot index.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &MeshRecord)> {
        self.records.iter().enumerate()
    }
}

impl Default for MeshArena {
    fn default() -> Self {
        Self::new()
    }
}
