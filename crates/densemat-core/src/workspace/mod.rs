//! Pooled, aligned storage for matrix backing stores
//!
//! This module provides aligned buffers and a buffer pool that enable:
//! - Proper SIMD alignment for every backing store
//! - Reuse of released stores to minimize allocations
//! - RAII-based resource management: a [`PooledBuffer`] goes back to its pool
//!   when dropped

use crate::{Error, Result};
use bytemuck::Zeroable;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::alloc::{alloc_zeroed, dealloc, handle_alloc_error, Layout};
use std::marker::PhantomData;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// A properly aligned, zero-initialised buffer for type T
///
/// Zero bytes must be a valid `T`, hence the `Zeroable` bound.
pub struct AlignedBuffer<T: Zeroable> {
    ptr: NonNull<T>,
    capacity: usize,
    len: usize,
    layout: Layout,
    _marker: PhantomData<T>,
}

impl<T: Zeroable> AlignedBuffer<T> {
    /// Create a new aligned buffer with specified alignment
    ///
    /// # Panics
    /// - If alignment is not a power of two
    /// - If alignment is less than the natural alignment of T
    pub fn new(capacity: usize, alignment: usize) -> Self {
        assert!(
            alignment.is_power_of_two(),
            "Alignment must be a power of two"
        );
        assert!(
            alignment >= mem::align_of::<T>(),
            "Alignment must be at least {}",
            mem::align_of::<T>()
        );

        let layout = Layout::from_size_align(capacity * mem::size_of::<T>(), alignment)
            .expect("Invalid layout");

        // Zero-sized allocations are UB for the global allocator
        let ptr = if layout.size() == 0 {
            NonNull::dangling()
        } else {
            let raw_ptr = unsafe { alloc_zeroed(layout) as *mut T };
            NonNull::new(raw_ptr).unwrap_or_else(|| handle_alloc_error(layout))
        };

        Self {
            ptr,
            capacity,
            len: 0,
            layout,
            _marker: PhantomData,
        }
    }

    /// A buffer with no capacity that never touches the allocator
    pub fn empty() -> Self {
        Self::new(0, mem::align_of::<T>())
    }

    /// Get a slice of the used portion
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// Get a mutable slice of the used portion
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Resize the buffer (doesn't reallocate, just changes len)
    ///
    /// # Panics
    /// If new_len > capacity
    #[inline]
    pub fn resize(&mut self, new_len: usize) {
        assert!(new_len <= self.capacity, "Cannot resize beyond capacity");
        self.len = new_len;
    }

    /// Clear the buffer (just resets len to 0)
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn alignment(&self) -> usize {
        self.layout.align()
    }
}

impl<T: Zeroable> Drop for AlignedBuffer<T> {
    fn drop(&mut self) {
        if self.layout.size() != 0 {
            unsafe {
                dealloc(self.ptr.as_ptr() as *mut u8, self.layout);
            }
        }
    }
}

// Safety: AlignedBuffer owns its data and T is Send
unsafe impl<T: Zeroable + Send> Send for AlignedBuffer<T> {}
// Safety: AlignedBuffer owns its data and T is Sync
unsafe impl<T: Zeroable + Sync> Sync for AlignedBuffer<T> {}

/// Pool sizing and alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Byte alignment of every buffer (power of two)
    pub alignment: usize,
    /// Maximum number of idle buffers kept for reuse
    pub max_buffers: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            alignment: 32,
            max_buffers: 64,
        }
    }
}

impl PoolConfig {
    pub fn with_alignment(mut self, alignment: usize) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_max_buffers(mut self, max_buffers: usize) -> Self {
        self.max_buffers = max_buffers;
        self
    }

    fn validate<T>(&self) -> Result<()> {
        if !self.alignment.is_power_of_two() {
            return Err(Error::invalid_parameter(format!(
                "pool alignment {} is not a power of two",
                self.alignment
            )));
        }
        if self.alignment < mem::align_of::<T>() {
            return Err(Error::invalid_parameter(format!(
                "pool alignment {} is below the natural alignment {}",
                self.alignment,
                mem::align_of::<T>()
            )));
        }
        Ok(())
    }
}

/// Pool of reusable aligned buffers
///
/// Buffers are handed out as [`PooledBuffer`]s that hold a weak reference
/// back to the pool and return themselves when dropped. If the pool is gone
/// by then, the buffer is simply freed.
pub struct BufferPool<T: Zeroable> {
    buffers: Mutex<Vec<AlignedBuffer<T>>>,
    config: PoolConfig,
}

impl<T: Zeroable + Copy + Send + 'static> BufferPool<T> {
    /// Create a new pool after validating the configuration
    pub fn new(config: PoolConfig) -> Result<Self> {
        config.validate::<T>()?;
        Ok(Self {
            buffers: Mutex::new(Vec::with_capacity(config.max_buffers)),
            config,
        })
    }

    /// Create a pool with [`PoolConfig::default`]
    pub fn with_defaults() -> Self {
        Self {
            buffers: Mutex::new(Vec::new()),
            config: PoolConfig::default(),
        }
    }

    pub fn config(&self) -> PoolConfig {
        self.config
    }

    /// Check out a zero-filled buffer of exactly `len` elements
    ///
    /// If a suitable buffer exists in the pool it is reused, otherwise a new
    /// one is allocated.
    pub fn checkout(self: &Arc<Self>, len: usize) -> PooledBuffer<T> {
        PooledBuffer {
            buffer: self.acquire(len),
            pool: Arc::downgrade(self),
        }
    }

    /// Get the number of idle buffers currently in the pool
    pub fn pool_size(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<AlignedBuffer<T>>> {
        self.buffers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn acquire(&self, len: usize) -> AlignedBuffer<T> {
        let reused = {
            let mut buffers = self.lock();
            buffers
                .iter()
                .position(|buf| buf.capacity() >= len)
                .map(|idx| buffers.swap_remove(idx))
        };

        match reused {
            Some(mut buffer) => {
                buffer.resize(len);
                buffer.as_mut_slice().fill(T::zeroed());
                buffer
            }
            None => {
                log::trace!("buffer pool miss: allocating {len} elements");
                let mut buffer = AlignedBuffer::new(len, self.config.alignment);
                buffer.resize(len);
                buffer
            }
        }
    }

    fn release(&self, mut buffer: AlignedBuffer<T>) {
        if buffer.capacity() == 0 {
            return;
        }
        buffer.clear();
        let mut buffers = self.lock();
        if buffers.len() < self.config.max_buffers {
            buffers.push(buffer);
        }
        // Otherwise let it drop
    }
}

/// A buffer checked out of a [`BufferPool`]
///
/// Exclusively owns its storage; dropping it returns the storage to the pool.
pub struct PooledBuffer<T: Zeroable + Copy + Send + 'static> {
    buffer: AlignedBuffer<T>,
    pool: Weak<BufferPool<T>>,
}

impl<T: Zeroable + Copy + Send + 'static> PooledBuffer<T> {
    /// Create a standalone zero-filled buffer without a pool
    pub fn new(len: usize, alignment: usize) -> Self {
        let mut buffer = AlignedBuffer::new(len, alignment);
        buffer.resize(len);
        Self {
            buffer,
            pool: Weak::new(),
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.buffer.as_slice()
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.buffer.as_mut_slice()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// The pool this buffer returns to, if it is still alive
    pub fn pool(&self) -> Option<Arc<BufferPool<T>>> {
        self.pool.upgrade()
    }

    /// Check out another zero-filled buffer from the same pool
    pub fn sibling(&self, len: usize) -> Self {
        match self.pool.upgrade() {
            Some(pool) => pool.checkout(len),
            None => Self::new(len, self.buffer.alignment()),
        }
    }

    /// Change the length, keeping the common prefix and zero-filling growth
    ///
    /// Growing past the capacity swaps in a larger buffer from the same pool
    /// and returns the old one.
    pub fn resize(&mut self, new_len: usize) {
        let old_len = self.buffer.len();
        if new_len <= self.buffer.capacity() {
            self.buffer.resize(new_len);
            if new_len > old_len {
                self.buffer.as_mut_slice()[old_len..].fill(T::zeroed());
            }
            return;
        }

        let mut grown = self.sibling(new_len);
        grown.as_mut_slice()[..old_len].copy_from_slice(self.buffer.as_slice());
        mem::swap(self, &mut grown);
        // `grown` now holds the old storage and releases it on drop
    }
}

impl<T: Zeroable + Copy + Send + 'static> Clone for PooledBuffer<T> {
    fn clone(&self) -> Self {
        let mut copy = self.sibling(self.len());
        copy.as_mut_slice().copy_from_slice(self.as_slice());
        copy
    }
}

impl<T: Zeroable + Copy + Send + 'static> Drop for PooledBuffer<T> {
    fn drop(&mut self) {
        if let Some(pool) = self.pool.upgrade() {
            let buffer = mem::replace(&mut self.buffer, AlignedBuffer::empty());
            pool.release(buffer);
        }
        // Otherwise the buffer drops normally
    }
}

impl<T: Zeroable + Copy + Send + 'static> Deref for PooledBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T: Zeroable + Copy + Send + 'static> DerefMut for PooledBuffer<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T: Zeroable + Copy + Send + std::fmt::Debug + 'static> std::fmt::Debug for PooledBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

lazy_static! {
    static ref GLOBAL_POOL: Arc<BufferPool<f32>> = Arc::new(BufferPool::with_defaults());
}

/// The process-wide pool backing matrices that are not given one explicitly
pub fn global_pool() -> &'static Arc<BufferPool<f32>> {
    &GLOBAL_POOL
}
