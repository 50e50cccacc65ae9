//! Typed handler calling convention.
//!
//! Handlers are plain functions or closures over [`RouteParam`] types.
//! Implementations exist for zero to four parameters, both for synchronous
//! functions ([`Handler`]) and for functions returning a future
//! ([`AsyncHandler`]). Either way the handler is erased into a single
//! [`Invoker`] that takes positional [`RouteValue`]s.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::future::{self, BoxFuture, FutureExt};
use uuid::Uuid;

use crate::error::{BoxError, RouterError, RouterResult};
use crate::routing::value::{RouteValue, ValueKind};

/// Erased handler taking arguments in handler-parameter order.
pub type Invoker = Arc<dyn Fn(Vec<RouteValue>) -> BoxFuture<'static, RouterResult<()>> + Send + Sync>;

/// A type that can receive the value of a dynamic segment.
pub trait RouteParam: Sized + Send + 'static {
    /// The segment kind this type binds to.
    const KIND: ValueKind;

    /// Convert an extracted value, `None` if the kinds differ.
    fn from_value(value: RouteValue) -> Option<Self>;
}

impl RouteParam for i64 {
    const KIND: ValueKind = ValueKind::Int;

    fn from_value(value: RouteValue) -> Option<Self> {
        match value {
            RouteValue::Int(v) => Some(v),
            _ => None,
        }
    }
}

impl RouteParam for f64 {
    const KIND: ValueKind = ValueKind::Float;

    fn from_value(value: RouteValue) -> Option<Self> {
        match value {
            RouteValue::Float(v) => Some(v),
            _ => None,
        }
    }
}

impl RouteParam for Uuid {
    const KIND: ValueKind = ValueKind::Uuid;

    fn from_value(value: RouteValue) -> Option<Self> {
        match value {
            RouteValue::Uuid(v) => Some(v),
            _ => None,
        }
    }
}

impl RouteParam for DateTime<Utc> {
    const KIND: ValueKind = ValueKind::Timestamp;

    fn from_value(value: RouteValue) -> Option<Self> {
        match value {
            RouteValue::Timestamp(v) => Some(v),
            _ => None,
        }
    }
}

/// Return types a handler may produce.
pub trait IntoHandlerResult {
    fn into_handler_result(self) -> RouterResult<()>;
}

impl IntoHandlerResult for () {
    fn into_handler_result(self) -> RouterResult<()> {
        Ok(())
    }
}

impl<E> IntoHandlerResult for Result<(), E>
where
    E: Into<BoxError>,
{
    fn into_handler_result(self) -> RouterResult<()> {
        self.map_err(|e| RouterError::Handler(e.into()))
    }
}

/// A synchronous route handler.
pub trait Handler<Args>: Send + Sync + 'static {
    /// Kinds of the formal parameters, in order.
    fn param_kinds() -> Vec<ValueKind>;

    /// Call the handler with arguments in parameter order.
    fn call(&self, args: Vec<RouteValue>) -> RouterResult<()>;
}

/// A route handler returning a future.
pub trait AsyncHandler<Args>: Send + Sync + 'static {
    /// Kinds of the formal parameters, in order.
    fn param_kinds() -> Vec<ValueKind>;

    /// Call the handler with arguments in parameter order.
    fn call(&self, args: Vec<RouteValue>) -> BoxFuture<'static, RouterResult<()>>;
}

/// Positional argument reader used by the handler impls.
struct Arguments {
    values: std::vec::IntoIter<RouteValue>,
    position: usize,
}

impl Arguments {
    fn new(values: Vec<RouteValue>, expected: usize) -> RouterResult<Self> {
        if values.len() != expected {
            return Err(RouterError::ArityMismatch {
                expected,
                found: values.len(),
            });
        }
        Ok(Self {
            values: values.into_iter(),
            position: 0,
        })
    }

    fn next<T: RouteParam>(&mut self) -> RouterResult<T> {
        let position = self.position;
        self.position += 1;

        let value = self.values.next().ok_or(RouterError::ArityMismatch {
            expected: position + 1,
            found: position,
        })?;
        let declared = value.kind();
        T::from_value(value).ok_or_else(|| RouterError::TypeMismatch {
            name: format!("#{}", position),
            declared,
            expected: T::KIND,
        })
    }
}

macro_rules! impl_handlers {
    ($($ty:ident),*) => {
        impl<F, R, $($ty,)*> Handler<($($ty,)*)> for F
        where
            F: Fn($($ty),*) -> R + Send + Sync + 'static,
            R: IntoHandlerResult,
            $($ty: RouteParam,)*
        {
            fn param_kinds() -> Vec<ValueKind> {
                vec![$($ty::KIND),*]
            }

            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn call(&self, args: Vec<RouteValue>) -> RouterResult<()> {
                let mut args = Arguments::new(args, <Self as Handler<($($ty,)*)>>::param_kinds().len())?;
                $(let $ty = args.next::<$ty>()?;)*
                (self)($($ty),*).into_handler_result()
            }
        }

        impl<F, Fut, R, $($ty,)*> AsyncHandler<($($ty,)*)> for F
        where
            F: Fn($($ty),*) -> Fut + Send + Sync + 'static,
            Fut: Future<Output = R> + Send + 'static,
            R: IntoHandlerResult,
            $($ty: RouteParam,)*
        {
            fn param_kinds() -> Vec<ValueKind> {
                vec![$($ty::KIND),*]
            }

            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn call(&self, args: Vec<RouteValue>) -> BoxFuture<'static, RouterResult<()>> {
                let expected = <Self as AsyncHandler<($($ty,)*)>>::param_kinds().len();
                let converted = Arguments::new(args, expected).and_then(|mut args| {
                    Ok(($(args.next::<$ty>()?,)*))
                });
                match converted {
                    Ok(($($ty,)*)) => {
                        let fut = (self)($($ty),*);
                        async move { fut.await.into_handler_result() }.boxed()
                    }
                    Err(e) => future::ready(Err(e)).boxed(),
                }
            }
        }
    };
}

impl_handlers!();
impl_handlers!(T1);
impl_handlers!(T1, T2);
impl_handlers!(T1, T2, T3);
impl_handlers!(T1, T2, T3, T4);

/// Erase a synchronous handler. The body runs when the invoker is called.
pub fn erase_sync<H, Args>(handler: H) -> Invoker
where
    H: Handler<Args>,
{
    Arc::new(move |args| future::ready(handler.call(args)).boxed())
}

/// Erase an asynchronous handler.
pub fn erase_async<H, Args>(handler: H) -> Invoker
where
    H: AsyncHandler<Args>,
{
    Arc::new(move |args| handler.call(args))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn kinds_of<H: Handler<Args>, Args>(_: &H) -> Vec<ValueKind> {
        H::param_kinds()
    }

    fn async_kinds_of<H: AsyncHandler<Args>, Args>(_: &H) -> Vec<ValueKind> {
        H::param_kinds()
    }

    #[test]
    fn test_param_kinds() {
        assert!(kinds_of(&|| {}).is_empty());
        assert_eq!(kinds_of(&|_a: i64| {}), vec![ValueKind::Int]);
        assert_eq!(
            kinds_of(&|_a: Uuid, _b: f64| {}),
            vec![ValueKind::Uuid, ValueKind::Float]
        );
        assert_eq!(
            async_kinds_of(&|_a: DateTime<Utc>| async {}),
            vec![ValueKind::Timestamp]
        );
    }

    #[test]
    fn test_sync_call_positional() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let handler = move |a: i64, b: i64| {
            sink.lock().unwrap().push((a, b));
        };

        Handler::call(&handler, vec![RouteValue::Int(2), RouteValue::Int(1)]).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![(2, 1)]);
    }

    #[test]
    fn test_argument_count_checked() {
        let handler = |_a: i64| {};
        let err = Handler::call(&handler, vec![]).unwrap_err();
        assert!(matches!(err, RouterError::ArityMismatch { expected: 1, found: 0 }));
    }

    #[test]
    fn test_argument_kind_checked() {
        let handler = |_a: i64| {};
        let err = Handler::call(&handler, vec![RouteValue::Float(1.0)]).unwrap_err();
        assert!(matches!(
            err,
            RouterError::TypeMismatch {
                declared: ValueKind::Float,
                expected: ValueKind::Int,
                ..
            }
        ));
    }

    #[test]
    fn test_handler_error_propagates() {
        let handler = |a: i64| -> Result<(), String> {
            if a < 0 {
                Err("negative".to_string())
            } else {
                Ok(())
            }
        };
        assert!(Handler::call(&handler, vec![RouteValue::Int(1)]).is_ok());
        let err = Handler::call(&handler, vec![RouteValue::Int(-1)]).unwrap_err();
        assert_eq!(err.to_string(), "handler failed: negative");
    }

    #[tokio::test]
    async fn test_erased_async_handler() {
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        let invoker = erase_async(move |id: Uuid| {
            let sink = sink.clone();
            async move {
                *sink.lock().unwrap() = Some(id);
            }
        });

        let id = Uuid::new_v4();
        invoker(vec![RouteValue::Uuid(id)]).await.unwrap();
        assert_eq!(*seen.lock().unwrap(), Some(id));
    }
}
