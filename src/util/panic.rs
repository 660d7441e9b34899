/// Runs the provided block, asserting that it panics with a contract violation whose message
/// contains `$kind` (e.g. `"precondition"`).
#[allow(unused_macros)]
macro_rules! assert_violates {
    ($run:block, $kind:literal) => {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| $run));
        match result {
            Ok(_) => panic!("expected a {} violation, but nothing panicked", $kind),
            Err(payload) => {
                let message = payload
                    .downcast_ref::<String>()
                    .map(String::as_str)
                    .or_else(|| payload.downcast_ref::<&str>().copied())
                    .unwrap_or_default();
                assert!(
                    message.contains(concat!($kind, " failed")),
                    "unexpected panic message: {message}"
                );
            }
        }
    };
}

#[allow(unused_imports)]
pub(crate) use assert_violates;
