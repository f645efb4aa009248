/// Evaluates the block, logging how long it took under `label`.
#[doc(hidden)]
#[macro_export]
macro_rules! time {
    ($label:expr, $($token:tt)*) => ({
        let start = std::time::Instant::now();
        let value = { $($token)* };
        $crate::tracing::info!("{} took {}ms", $label, start.elapsed().as_millis());
        value
    });
}

pub use time;
