//! Command identifiers and their session requirements.

/// Every command the server understands, by wire name.
#[derive(Debug, Copy, Clone, PartialEq, Eq, crate::NameTable)]
pub enum CommandId {
    /// Legacy handle creation, acknowledged
    #[names("NVA_CreateHandle")]
    CreateHandle,
    /// Initialize the radar and open the session
    #[names("OpenRadar")]
    OpenRadar,
    /// Close the session
    #[names("Close")]
    Close,
    /// Acquire one raw frame
    #[names("GetFrameRaw")]
    GetFrameRaw,
    /// Acquire one normalized frame
    #[names("GetFrameNormalized")]
    GetFrameNormalized,
    /// Read a variable
    #[names("VarGetValue_ByName")]
    VarGet,
    /// Write a variable
    #[names("VarSetValue_ByName")]
    VarSet,
    /// List every variable name
    #[names("ListVariables")]
    ListVariables,
    /// Read an SPI register
    #[names("RegisterRead")]
    RegisterRead,
    /// Restore driver defaults
    #[names("VarsResetAllToDefault")]
    ResetToDefaults,
    /// Report the protocol version
    #[names("ConnectorVersion")]
    ConnectorVersion,
    /// Toggle length-prefixed framing
    #[names("SendPacketLengths")]
    SendPacketLengths,
    /// Legacy register metadata query, acknowledged
    #[names("GetRegisterProperties")]
    GetRegisterProperties,
    /// Legacy IO pin control, acknowledged
    #[names("SetIOPinDirection")]
    SetIoPinDirection,
    /// Legacy IO pin control, acknowledged
    #[names("WriteIOPin")]
    WriteIoPin,
    /// Legacy IO pin control, acknowledged
    #[names("ReadIOPin")]
    ReadIoPin,
}

/// Session state a command needs before it runs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionGate {
    /// Runs in any state
    Any,
    /// Needs an open session
    Open,
    /// Needs a closed session
    Closed,
}

impl CommandId {
    /// Session requirement of this command.
    pub fn gate(self) -> SessionGate {
        match self {
            CommandId::OpenRadar => SessionGate::Closed,
            CommandId::Close
            | CommandId::GetFrameRaw
            | CommandId::GetFrameNormalized
            | CommandId::VarGet
            | CommandId::VarSet
            | CommandId::ListVariables
            | CommandId::RegisterRead
            | CommandId::ResetToDefaults => SessionGate::Open,
            _ => SessionGate::Any,
        }
    }
}
