//! gsc-alloc - Allocator boundary used by `new` lowering.
//!
//! The IR generator needs only one fact about memory management: a pointer to
//! `byte_size` zeroed bytes can be obtained with a single call. What backs
//! that call (a real collector, an arena, a page map) is deliberately opaque
//! to the compiler, which never runs a collected Gunderscript program itself
//! — it only needs the boundary to exist so `new` lowering and IR tests have
//! something to call through. [`BumpAllocator`] is the one reference
//! implementation kept here: it maps pages on demand and never reclaims.

use std::sync::Mutex;

use thiserror::Error;

/// A single `allocate(byte_size) -> pointer` boundary. Memory returned is
/// always zeroed. Implementations decide everything about how (and whether)
/// that memory is ever reclaimed; the trait makes no promise either way.
pub trait Allocator {
    fn allocate(&self, byte_size: u32) -> Result<*mut u8, AllocError>;
}

#[derive(Debug, Error)]
pub enum AllocError {
    #[error("requested allocation of {0} bytes exceeds the allocator's page budget")]
    OutOfMemory(u32),
    #[error("failed to map a new page: {0}")]
    MapFailed(#[from] std::io::Error),
}

/// Bump-allocates zeroed pages and never collects. Each call either carves
/// `byte_size` bytes off the current page or maps a fresh page sized to fit
/// the request, rounded up to the system page size.
pub struct BumpAllocator {
    state: Mutex<BumpState>,
}

struct BumpState {
    pages: Vec<memmap2::MmapMut>,
    cursor: usize,
}

impl BumpAllocator {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(BumpState { pages: Vec::new(), cursor: 0 }),
        }
    }

    /// Total bytes currently mapped across all pages, for tests that want to
    /// assert a new page was (or wasn't) pulled in.
    pub fn mapped_bytes(&self) -> usize {
        self.state.lock().unwrap().pages.iter().map(|p| p.len()).sum()
    }
}

impl Default for BumpAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl Allocator for BumpAllocator {
    fn allocate(&self, byte_size: u32) -> Result<*mut u8, AllocError> {
        let mut state = self.state.lock().unwrap();
        let size = byte_size as usize;

        let needs_new_page = match state.pages.last() {
            Some(page) => state.cursor + size > page.len(),
            None => true,
        };
        if needs_new_page {
            let page_len = page_size::get().max(size);
            let map = memmap2::MmapMut::map_anon(page_len)?;
            state.pages.push(map);
            state.cursor = 0;
        }

        let page = state.pages.last_mut().expect("page was just pushed");
        let offset = state.cursor;
        state.cursor += size;
        // SAFETY: `offset..offset + size` was just verified to fit within
        // the current page, and the page is freshly mapped (zeroed) or has
        // only ever been carved up by this same method.
        Ok(unsafe { page.as_mut_ptr().add(offset) })
    }
}

// SAFETY: every `*mut u8` handed out aliases a distinct, non-overlapping
// region of a page owned by this allocator; the mutex serializes all
// bookkeeping around the shared `Vec<MmapMut>`.
unsafe impl Send for BumpAllocator {}
unsafe impl Sync for BumpAllocator {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocations_are_non_overlapping() {
        let alloc = BumpAllocator::new();
        let a = alloc.allocate(16).unwrap();
        let b = alloc.allocate(16).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_large_allocation_maps_its_own_page() {
        let alloc = BumpAllocator::new();
        let huge = page_size::get() as u32 * 2;
        let ptr = alloc.allocate(huge);
        assert!(ptr.is_ok());
        assert!(alloc.mapped_bytes() >= huge as usize);
    }

    #[test]
    fn test_fresh_page_is_zeroed() {
        let alloc = BumpAllocator::new();
        let ptr = alloc.allocate(64).unwrap();
        let bytes = unsafe { std::slice::from_raw_parts(ptr, 64) };
        assert!(bytes.iter().all(|&b| b == 0));
    }
}
