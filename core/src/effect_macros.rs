//! Declarative macros for ergonomic effect construction
//!
//! These macros reduce boilerplate when creating `Effect` variants in reducers.

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust,ignore
/// use ferry_seating_core::async_effect;
///
/// async_effect! {
///     sink.on_change(layout, seats);
///     None
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

/// Create an `Effect::Delay` for scheduling delayed actions
///
/// # Example
///
/// ```rust,ignore
/// use ferry_seating_core::delay;
/// use std::time::Duration;
///
/// delay! {
///     duration: Duration::from_millis(400),
///     action: EditorAction::FlushChanges { revision }
/// }
/// ```
#[macro_export]
macro_rules! delay {
    (
        duration: $duration:expr,
        action: $action:expr
    ) => {
        $crate::effect::Effect::Delay {
            duration: $duration,
            action: ::std::boxed::Box::new($action),
        }
    };
}

/// Create a debounced action: a `Delay` registered under a key, so that a
/// newer debounce with the same key aborts the pending one.
///
/// # Example
///
/// ```rust,ignore
/// use ferry_seating_core::debounce;
///
/// debounce! {
///     id: NOTIFY_EFFECT,
///     duration: settings.notify_debounce,
///     action: EditorAction::FlushChanges { revision }
/// }
/// ```
#[macro_export]
macro_rules! debounce {
    (
        id: $id:expr,
        duration: $duration:expr,
        action: $action:expr
    ) => {
        $crate::effect::Effect::Cancellable {
            id: $id,
            effect: ::std::boxed::Box::new($crate::effect::Effect::Delay {
                duration: $duration,
                action: ::std::boxed::Box::new($action),
            }),
        }
    };
}
