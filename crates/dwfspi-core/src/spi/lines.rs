//! Data line modes and idle policies

/// Data line configuration for a transfer (the vendor's `cDQ` argument)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DqMode {
    /// Single bidirectional line
    Siso,
    /// Separate MOSI and MISO lines
    #[default]
    MosiMiso,
    /// Two data lines
    Dual,
    /// Four data lines
    Quad,
}

impl DqMode {
    /// Value passed as `cDQ`
    pub const fn raw(&self) -> i32 {
        match self {
            Self::Siso => 0,
            Self::MosiMiso => 1,
            Self::Dual => 2,
            Self::Quad => 4,
        }
    }
}

/// Output level of a data line while the bus is idle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IdleMode {
    /// Keep the initial value
    Init,
    /// Drive low
    Low,
    /// Drive high
    High,
    /// High impedance
    #[default]
    Zet,
}

impl IdleMode {
    /// Value of the vendor's `DwfDigitalOutIdle` enumeration
    pub const fn raw(&self) -> i32 {
        match self {
            Self::Init => 0,
            Self::Low => 1,
            Self::High => 2,
            Self::Zet => 3,
        }
    }
}
