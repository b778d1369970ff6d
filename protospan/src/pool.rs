//! Process-wide pool of large string-encoding scratch buffers.
//!
//! `StreamWriter`'s short-string fast path (see `writer::STACK_STRING_CHARS`)
//! encodes directly into the stack. Strings over that threshold borrow a
//! `Vec<u8>` from this pool instead of allocating fresh every call. The pool
//! is a plain free-list guarded by `parking_lot::Mutex`: the critical
//! section is a single `Vec::pop`/`Vec::push`, short enough that
//! `parking_lot`'s uncontended fast path beats paying for a condvar.
//!
//! `parking_lot::Mutex` needs an OS to park threads on, so the pool itself
//! is `std`-only; under `no_std` (`alloc` only), [`acquire`] falls back to
//! a fresh, unpooled allocation every call — still correct, just without
//! the reuse.

#[cfg(feature = "std")]
mod pooled {
    use alloc::vec::Vec;

    use parking_lot::Mutex;

    static POOL: Mutex<Vec<Vec<u8>>> = Mutex::new(Vec::new());

    /// A pooled scratch buffer, returned to the pool when dropped.
    ///
    /// Acquired via [`super::acquire`]. The buffer is released on every
    /// exit path — normal return, early return, or panic unwind — because
    /// release happens in `Drop`, not at a single call site the caller
    /// could skip.
    pub struct PooledBuffer {
        buf: Vec<u8>,
    }

    impl PooledBuffer {
        #[inline]
        pub fn as_mut_vec(&mut self) -> &mut Vec<u8> {
            &mut self.buf
        }
    }

    impl Drop for PooledBuffer {
        fn drop(&mut self) {
            let mut buf = core::mem::take(&mut self.buf);
            buf.clear();
            POOL.lock().push(buf);
        }
    }

    /// Acquires a scratch buffer from the pool, allocating a new one only
    /// if the pool is empty.
    pub fn acquire() -> PooledBuffer {
        let buf = POOL.lock().pop().unwrap_or_default();
        PooledBuffer { buf }
    }
}

#[cfg(not(feature = "std"))]
mod pooled {
    use alloc::vec::Vec;

    /// Same shape as the `std` pooled buffer, minus the pool: nothing to
    /// park a thread on under `no_std`, so each call just allocates.
    pub struct PooledBuffer {
        buf: Vec<u8>,
    }

    impl PooledBuffer {
        #[inline]
        pub fn as_mut_vec(&mut self) -> &mut Vec<u8> {
            &mut self.buf
        }
    }

    pub fn acquire() -> PooledBuffer {
        PooledBuffer { buf: Vec::new() }
    }
}

pub use pooled::{acquire, PooledBuffer};

#[cfg(all(test, feature = "std"))]
mod test {
    use super::*;

    #[test]
    fn buffer_is_cleared_on_release() {
        {
            let mut guard = acquire();
            guard.as_mut_vec().extend_from_slice(b"hello");
        }
        let mut guard = acquire();
        assert!(guard.as_mut_vec().is_empty());
    }
}
