//! Callback units and their invocation contract.
//!
//! A callback is bound to a named method on the record, to source text the
//! record evaluates, or to a closure. Closure callbacks come in three
//! shapes, fixed at registration time: zero arguments, transition context,
//! or a variadic argument list. Whatever the shape, the record is the
//! explicit execution context (`&mut R` as first parameter); before
//! variadic callbacks receive `[transition]` and after variadic callbacks
//! receive `[transition, record]`, with the record position flagged by a
//! marker since the receiver is already the context parameter.

use super::record::Record;
use super::state::StateValue;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Snapshot of an in-flight transition, handed to callbacks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionContext {
    /// Identifier of the transition being performed.
    pub id: Uuid,
    /// Event that triggered the transition.
    pub event: String,
    /// State being transitioned from.
    pub from: StateValue,
    /// State being transitioned to.
    pub to: StateValue,
    /// Attribute the machine stores state in.
    pub attribute: String,
}

/// Positional argument delivered to variadic callbacks.
#[derive(Clone, Debug)]
pub enum CallbackArg {
    /// The transition driving the invocation.
    Transition(TransitionContext),
    /// The receiver's position in the argument list. The record itself is
    /// the invocation's context parameter, not a second borrowed value.
    Record,
}

impl CallbackArg {
    /// The transition context, when this argument carries one.
    pub fn transition(&self) -> Option<&TransitionContext> {
        match self {
            CallbackArg::Transition(ctx) => Some(ctx),
            CallbackArg::Record => None,
        }
    }
}

/// Errors raised while executing a callback.
///
/// These are runtime execution failures; a malformed registration is
/// rejected earlier with a configuration error.
#[derive(Debug, Error)]
pub enum CallbackError {
    #[error("record has no callback method named '{0}'")]
    UnknownCallback(String),

    #[error("record does not evaluate expression callbacks")]
    ExpressionUnsupported,

    #[error("expression evaluation failed: {0}")]
    ExpressionFailed(String),

    #[error("callback failed: {0}")]
    Failed(String),
}

type HookFn0<R> = Arc<dyn Fn(&mut R) + Send + Sync>;
type HookFn1<R> = Arc<dyn Fn(&mut R, &TransitionContext) + Send + Sync>;
type HookFnN<R> = Arc<dyn Fn(&mut R, &[CallbackArg]) + Send + Sync>;

/// A unit of behavior run before or after a transition.
pub enum Callback<R> {
    /// Invokes the correspondingly named method on the record.
    Named(String),
    /// Source text evaluated in the record's context.
    Expression(String),
    /// Closure taking only the record.
    NoArgs(HookFn0<R>),
    /// Closure taking the record and the transition context.
    WithContext(HookFn1<R>),
    /// Closure taking the record and the full argument list.
    Variadic(HookFnN<R>),
}

impl<R> Callback<R> {
    /// Callback bound to a named method on the record.
    pub fn named(name: impl Into<String>) -> Self {
        Callback::Named(name.into())
    }

    /// Callback bound to source text the record evaluates.
    pub fn expression(source: impl Into<String>) -> Self {
        Callback::Expression(source.into())
    }

    /// Zero-argument closure callback.
    pub fn of<F>(f: F) -> Self
    where
        F: Fn(&mut R) + Send + Sync + 'static,
    {
        Callback::NoArgs(Arc::new(f))
    }

    /// Closure callback receiving the transition context.
    pub fn with_context<F>(f: F) -> Self
    where
        F: Fn(&mut R, &TransitionContext) + Send + Sync + 'static,
    {
        Callback::WithContext(Arc::new(f))
    }

    /// Closure callback receiving the positional argument list.
    pub fn variadic<F>(f: F) -> Self
    where
        F: Fn(&mut R, &[CallbackArg]) + Send + Sync + 'static,
    {
        Callback::Variadic(Arc::new(f))
    }

    /// Human-readable variant name, used in configuration errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Callback::Named(_) => "named",
            Callback::Expression(_) => "expression",
            Callback::NoArgs(_) => "closure",
            Callback::WithContext(_) => "closure",
            Callback::Variadic(_) => "closure",
        }
    }

    /// Whether the registration target is usable at all.
    ///
    /// Blank method names and blank source text can never execute, so
    /// machines reject them at registration time.
    pub(crate) fn is_well_formed(&self) -> bool {
        match self {
            Callback::Named(name) => !name.trim().is_empty(),
            Callback::Expression(source) => !source.trim().is_empty(),
            _ => true,
        }
    }
}

impl<R: Record> Callback<R> {
    /// Invoke as a before-transition callback.
    ///
    /// Variadic callbacks receive a list containing just the transition.
    pub fn invoke_before(
        &self,
        record: &mut R,
        ctx: &TransitionContext,
    ) -> Result<(), CallbackError> {
        self.invoke(record, ctx, &[CallbackArg::Transition(ctx.clone())])
    }

    /// Invoke as an after-transition callback.
    ///
    /// Variadic callbacks receive the transition followed by the record.
    pub fn invoke_after(
        &self,
        record: &mut R,
        ctx: &TransitionContext,
    ) -> Result<(), CallbackError> {
        self.invoke(
            record,
            ctx,
            &[CallbackArg::Transition(ctx.clone()), CallbackArg::Record],
        )
    }

    fn invoke(
        &self,
        record: &mut R,
        ctx: &TransitionContext,
        args: &[CallbackArg],
    ) -> Result<(), CallbackError> {
        match self {
            Callback::Named(name) => record.run_named_callback(name, args),
            Callback::Expression(source) => record.eval_expression(source),
            Callback::NoArgs(f) => {
                f(record);
                Ok(())
            }
            Callback::WithContext(f) => {
                f(record, ctx);
                Ok(())
            }
            Callback::Variadic(f) => {
                f(record, args);
                Ok(())
            }
        }
    }
}

impl<R> Clone for Callback<R> {
    fn clone(&self) -> Self {
        match self {
            Callback::Named(name) => Callback::Named(name.clone()),
            Callback::Expression(source) => Callback::Expression(source.clone()),
            Callback::NoArgs(f) => Callback::NoArgs(Arc::clone(f)),
            Callback::WithContext(f) => Callback::WithContext(Arc::clone(f)),
            Callback::Variadic(f) => Callback::Variadic(Arc::clone(f)),
        }
    }
}
