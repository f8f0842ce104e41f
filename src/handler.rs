//! Calling a wrapped middleware function.
//!
//! # How arguments are forwarded
//!
//! A [`Middleware`](crate::Middleware) must call its function with exactly
//! the arguments it was given and hand back exactly what the function
//! returned. Rust has no variadic `Fn`, so arguments travel as a tuple and
//! [`Invoke`] unpacks it:
//!
//! ```text
//! entry.call((req, res))                    ← framework writes this
//!        ↓ Middleware::call
//! Invoke::<(Req, Res)>::invoke(&*func, …)   ← blanket impl below
//!        ↓
//! func(req, res)                            ← one direct call, result returned as-is
//! ```
//!
//! Async middleware needs nothing special: the function returns a future,
//! and the future is what comes back out of `call`.

/// Implemented for every function that can be stored in a middleware entry.
///
/// `Args` is the argument tuple: `()`, `(A,)`, `(A, B)`, `(A, B, C)` or
/// `(A, B, C, D)`. You never implement this yourself. It is satisfied by any
/// `Fn` with a matching arity, including `dyn Fn(..) -> R` trait objects, so
/// entries with different concrete closures can live in one collection.
///
/// The trait is **sealed** (via the private `Sealed` supertrait): only the
/// blanket impls below can satisfy it.
pub trait Invoke<Args>: private::Sealed<Args> {
    /// What the function returns.
    type Output;

    #[doc(hidden)]
    fn invoke(&self, args: Args) -> Self::Output;
}

/// The sealing module. Because `Sealed` is private, external crates cannot
/// name it and therefore cannot implement `Invoke` on their own types.
mod private {
    pub trait Sealed<Args> {}
}

// ── Blanket implementations ───────────────────────────────────────────────────

macro_rules! impl_invoke {
    ($($ty:ident),*) => {
        impl<F, R, $($ty,)*> private::Sealed<($($ty,)*)> for F
        where
            F: ?Sized + Fn($($ty),*) -> R,
        {
        }

        impl<F, R, $($ty,)*> Invoke<($($ty,)*)> for F
        where
            F: ?Sized + Fn($($ty),*) -> R,
        {
            type Output = R;

            #[allow(non_snake_case)]
            fn invoke(&self, ($($ty,)*): ($($ty,)*)) -> R {
                (self)($($ty),*)
            }
        }
    };
}

impl_invoke!();
impl_invoke!(A);
impl_invoke!(A, B);
impl_invoke!(A, B, C);
impl_invoke!(A, B, C, D);
