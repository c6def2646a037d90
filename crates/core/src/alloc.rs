//! Allocator hook for tree-sitter on `wasm32`.
//!
//! `wasm32-unknown-unknown` builds of tree-sitter link a tiny libc shim whose `malloc`/`free`
//! corrupt memory when trees are dropped from JS. On that target tree-sitter allocations are
//! routed through Rust's global allocator instead. Everywhere else this module is a no-op.

#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_tree_sitter_allocator() {}

#[cfg(target_arch = "wasm32")]
pub fn ensure_tree_sitter_allocator() {
    static INSTALL: std::sync::Once = std::sync::Once::new();

    INSTALL.call_once(|| {
        // SAFETY: runs once, before the first parser is created.
        unsafe {
            tree_sitter::set_allocator(
                Some(shim::malloc),
                Some(shim::calloc),
                Some(shim::realloc),
                Some(shim::free),
            );
        }
    });
}

#[cfg(target_arch = "wasm32")]
mod shim {
    use core::{ffi::c_void, ptr};
    use std::alloc::{Layout, alloc, dealloc};

    /// Each block starts with a header holding the requested size. The header is as wide as the
    /// alignment so the pointer handed to C stays 16-byte aligned.
    const ALIGN: usize = 16;
    const HEADER: usize = ALIGN;

    fn layout_for(size: usize) -> Option<Layout> {
        Layout::from_size_align(size.checked_add(HEADER)?, ALIGN).ok()
    }

    /// Recovers the block base and requested size from a pointer returned by [`malloc`].
    ///
    /// # Safety
    ///
    /// `user` must be a non-null pointer previously returned by [`malloc`] and not yet freed.
    unsafe fn block(user: *mut c_void) -> (*mut u8, usize) {
        let base = unsafe { (user as *mut u8).sub(HEADER) };
        let size = unsafe { (base as *const usize).read() };
        (base, size)
    }

    pub(super) unsafe extern "C" fn malloc(size: usize) -> *mut c_void {
        // Zero-sized requests still get a unique header-only block.
        let Some(layout) = layout_for(size) else {
            return ptr::null_mut();
        };
        let base = unsafe { alloc(layout) };
        if base.is_null() {
            return ptr::null_mut();
        }
        unsafe {
            (base as *mut usize).write(size);
            base.add(HEADER) as *mut c_void
        }
    }

    pub(super) unsafe extern "C" fn calloc(count: usize, size: usize) -> *mut c_void {
        let Some(total) = count.checked_mul(size) else {
            return ptr::null_mut();
        };
        let user = unsafe { malloc(total) };
        if !user.is_null() {
            unsafe { ptr::write_bytes(user as *mut u8, 0, total) };
        }
        user
    }

    pub(super) unsafe extern "C" fn free(user: *mut c_void) {
        if user.is_null() {
            return;
        }
        let (base, size) = unsafe { block(user) };
        if let Some(layout) = layout_for(size) {
            unsafe { dealloc(base, layout) };
        }
    }

    pub(super) unsafe extern "C" fn realloc(user: *mut c_void, size: usize) -> *mut c_void {
        if user.is_null() {
            return unsafe { malloc(size) };
        }
        if size == 0 {
            unsafe { free(user) };
            return ptr::null_mut();
        }

        let (_, old_size) = unsafe { block(user) };
        let moved = unsafe { malloc(size) };
        if moved.is_null() {
            return ptr::null_mut();
        }
        unsafe {
            ptr::copy_nonoverlapping(user as *const u8, moved as *mut u8, old_size.min(size));
            free(user);
        }
        moved
    }
}
