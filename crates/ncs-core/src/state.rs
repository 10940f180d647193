//! Resource states and device properties reported through options.

use std::fmt;

macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $code:literal => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub fn code(self) -> u32 {
                match self {
                    $($name::$variant => $code),+
                }
            }

            pub fn from_code(code: u32) -> Option<Self> {
                match code {
                    $($code => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $($name::$variant => f.write_str($label)),+
                }
            }
        }
    };
}

coded_enum!(
    /// Lifecycle state of a device handle.
    DeviceState {
        Created = 0 => "DEVICE_CREATED",
        Opened = 1 => "DEVICE_OPENED",
        Closed = 2 => "DEVICE_CLOSED",
    }
);

coded_enum!(
    /// Lifecycle state of a graph handle.
    GraphState {
        Created = 0 => "GRAPH_CREATED",
        Allocated = 1 => "GRAPH_ALLOCATED",
        WaitingForInput = 2 => "GRAPH_WAITING_FOR_INPUT",
        Running = 3 => "GRAPH_RUNNING",
    }
);

coded_enum!(
    /// Lifecycle state of a FIFO handle.
    FifoState {
        Created = 0 => "FIFO_CREATED",
        Allocated = 1 => "FIFO_ALLOCATED",
    }
);

coded_enum!(
    /// Hardware generation of the device.
    DeviceHwVersion {
        Ma2450 = 0 => "MA2450",
        Ma2480 = 1 => "MA2480",
    }
);

coded_enum!(
    /// Thermal throttling level.
    ThermalThrottle {
        NoThrottle = 0 => "NO_THERMAL_THROTTLE",
        /// Short throttling between inferences.
        LowerGuard = 1 => "LOWER_GUARD_THERMAL_THROTTLE",
        /// Long throttling between inferences.
        UpperGuard = 2 => "UPPER_GUARD_THERMAL_THROTTLE",
    }
);
