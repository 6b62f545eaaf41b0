//! Conditional parallel iteration.
//!
//! With the `parallel` feature (on by default) channel-wise work such as the
//! per-channel correlation of the joint solver runs on rayon's pool. Without
//! it the same code runs sequentially, which keeps WASM and single-threaded
//! builds working.
//!
//! ```ignore
//! use crate::iter_maybe_parallel;
//!
//! let spectra: Vec<_> = iter_maybe_parallel!(0..n_channels)
//!     .map(|c| correlate(c))
//!     .collect();
//! ```

/// Iterate a range or an owned collection in parallel when the `parallel`
/// feature is enabled, sequentially otherwise.
#[macro_export]
macro_rules! iter_maybe_parallel {
    ($expr:expr) => {{
        #[cfg(feature = "parallel")]
        {
            use rayon::iter::IntoParallelIterator;

            IntoParallelIterator::into_par_iter($expr)
        }
        #[cfg(not(feature = "parallel"))]
        {
            IntoIterator::into_iter($expr)
        }
    }};
}

pub use iter_maybe_parallel;

#[cfg(test)]
mod tests {
    #[cfg(feature = "parallel")]
    use rayon::iter::ParallelIterator;

    #[test]
    fn test_order_is_preserved() {
        let doubled: Vec<usize> = iter_maybe_parallel!(0..64usize).map(|i| i * 2).collect();
        assert_eq!(doubled.len(), 64);
        for (i, v) in doubled.iter().enumerate() {
            assert_eq!(*v, 2 * i);
        }
    }
}
