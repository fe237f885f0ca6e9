//! Worker-pool fan-out
//!
//! The frame FFTs of the spectrogram, the Welch segments of the ENF
//! scan, and the splice scan chunks are all independent units of work
//! whose results must come back in index order. [`ordered_map`] is the
//! one primitive they share: spread over the rayon pool when the
//! `parallel` feature is on, a plain loop on the calling thread when it
//! is off. Callers never observe completion order either way.

/// Map `f` over `0..len`, returning results in index order.
///
/// `out[i] == f(i)` holds regardless of which worker ran `i` or when it
/// finished.
pub fn ordered_map<T, F>(len: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Send + Sync,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        (0..len).into_par_iter().map(f).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        (0..len).map(f).collect()
    }
}

/// Pin the worker-pool size for this process.
///
/// rayon honors only the first global-pool initialization, so call this
/// once at startup. With no explicit count the pool is left at its
/// default (the logical CPU count). Returns the number of workers the
/// analysis loops will actually use.
pub fn set_worker_threads(count: Option<u32>) -> usize {
    #[cfg(feature = "parallel")]
    {
        if let Some(n) = count {
            // Silently loses against an already-running pool; the
            // return value reports what we really got.
            let _ = rayon::ThreadPoolBuilder::new()
                .num_threads(n as usize)
                .build_global();
        }
        rayon::current_num_threads()
    }
    #[cfg(not(feature = "parallel"))]
    {
        let _ = count;
        1
    }
}
