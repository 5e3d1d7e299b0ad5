//! Communication specifications.
//!
//! A port's ComSpecs layer per-member communication attributes over the
//! bound interface: init values, queueing, timeouts. Configs are one
//! struct per interface family with statically declared optional fields;
//! which fields are legal additionally depends on the port direction and
//! the workspace schema era, checked during derivation.

mod derive;

use smol_str::SmolStr;

use crate::base::ArPath;
use crate::values::{RawValue, ValueSpec};

/// A derived communication specification, one per selected interface
/// member.
#[derive(Debug, Clone, PartialEq)]
pub enum ComSpec {
    SenderReceiver(SenderReceiverComSpec),
    NvData(SenderReceiverComSpec),
    ClientServer(ClientServerComSpec),
    ModeSwitch(ModeSwitchComSpec),
    Parameter(ParameterComSpec),
}

impl ComSpec {
    /// The name of the interface member this com-spec applies to.
    pub fn member(&self) -> &str {
        match self {
            ComSpec::SenderReceiver(cs) | ComSpec::NvData(cs) => &cs.element,
            ComSpec::ClientServer(cs) => &cs.operation,
            ComSpec::ModeSwitch(cs) => &cs.mode_group,
            ComSpec::Parameter(cs) => &cs.parameter,
        }
    }
}

/// Com-spec for one data element of a sender-receiver or NV-data
/// interface.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SenderReceiverComSpec {
    pub element: SmolStr,
    pub init_value: Option<ValueSpec>,
    pub init_value_ref: Option<ArPath>,
    pub alive_timeout: Option<f64>,
    pub queue_length: Option<u32>,
    pub can_invalidate: Option<bool>,
}

/// Com-spec for one operation of a client-server interface.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClientServerComSpec {
    pub operation: SmolStr,
    pub queue_length: Option<u32>,
}

/// Com-spec for the mode group of a mode-switch interface.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModeSwitchComSpec {
    pub mode_group: SmolStr,
    pub enhanced_mode: Option<bool>,
    pub support_async: Option<bool>,
    pub queue_length: Option<u32>,
    pub mode_switch_ack_timeout: Option<f64>,
}

/// Com-spec for one parameter of a parameter interface.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterComSpec {
    pub parameter: SmolStr,
    pub init_value: Option<ValueSpec>,
}

// ============================================================================
// CONFIGS
// ============================================================================

/// Caller-supplied com-spec configuration, one variant per interface
/// family. Each field is optional; derivation rejects fields the port
/// direction or schema era does not allow, naming the field and the
/// interface.
#[derive(Debug, Clone, PartialEq)]
pub enum ComSpecConfig {
    SenderReceiver(SenderReceiverConfig),
    ClientServer(ClientServerConfig),
    ModeSwitch(ModeSwitchConfig),
    Parameter(ParameterConfig),
}

impl ComSpecConfig {
    /// Get a display label for this config variant.
    pub fn display(&self) -> &'static str {
        match self {
            ComSpecConfig::SenderReceiver(_) => "sender-receiver",
            ComSpecConfig::ClientServer(_) => "client-server",
            ComSpecConfig::ModeSwitch(_) => "mode-switch",
            ComSpecConfig::Parameter(_) => "parameter",
        }
    }
}

/// Config for sender-receiver and NV-data interfaces.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SenderReceiverConfig {
    /// Target data element; may be omitted when the interface has exactly
    /// one.
    pub element: Option<SmolStr>,
    /// Raw init value, built against the element's data type. Mutually
    /// exclusive with `init_value_ref`.
    pub init_value: Option<RawValue>,
    /// Reference to a constant used as init value. Mutually exclusive
    /// with `init_value`.
    pub init_value_ref: Option<ArPath>,
    /// Require ports only.
    pub alive_timeout: Option<f64>,
    /// Queued require elements only; zero or unset defaults to 1.
    pub queue_length: Option<u32>,
    /// Provide ports only; defaults to false.
    pub can_invalidate: Option<bool>,
}

/// Config for client-server interfaces.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClientServerConfig {
    /// Target operation; may be omitted when the interface has exactly
    /// one.
    pub operation: Option<SmolStr>,
    /// Server (provide) side only.
    pub queue_length: Option<u32>,
}

/// Config for mode-switch interfaces.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModeSwitchConfig {
    /// Target mode group; may be omitted when the interface has exactly
    /// one.
    pub mode_group: Option<SmolStr>,
    pub enhanced_mode: Option<bool>,
    /// Require ports only.
    pub support_async: Option<bool>,
    /// Provide ports only.
    pub queue_length: Option<u32>,
    /// Provide ports only; AUTOSAR 4 schemas only.
    pub mode_switch_ack_timeout: Option<f64>,
}

/// Config for parameter interfaces.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterConfig {
    /// Target parameter; may be omitted when the interface has exactly
    /// one.
    pub parameter: Option<SmolStr>,
    /// Raw init value, built against the parameter's data type.
    pub init_value: Option<RawValue>,
}
