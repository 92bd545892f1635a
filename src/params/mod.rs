//! Control parameters shared between the control thread and the audio thread.
//!
//! The [`ParameterRegistry`] is the single writable store: host automation or a
//! UI thread writes into it at any time with plain atomic stores. The audio
//! thread never reads it mid-block. Instead it captures a
//! [`ParameterSnapshot`] once at the top of each block and hands that
//! immutable copy to every voice, so all samples of a block see the same
//! values even if the control thread keeps writing.

/// Lock-free parameter storage and single-parameter handles.
pub mod registry;
/// Per-block immutable copies of the registry, grouped per component.
pub mod snapshot;

pub use registry::{ParamHandle, ParamId, ParamRange, ParameterRegistry};
pub use snapshot::{
    EnvelopeParams, FilterParams, HpfParams, LfoParams, MasterParams, OscillatorParams,
    ParameterSnapshot,
};
