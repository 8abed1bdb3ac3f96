//! Closed value sets stored as short strings in the database.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name { $($variant),+ }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self { $($name::$variant => $text),+ }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
        }

        impl FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    other => Err(ModelError::Validation(format!(concat!("unknown ", stringify!($name), " '{}'"), other))),
                }
            }
        }
    };
}

string_enum!(
    /// Lifecycle of an order as seen by admins and customers.
    OrderStatus {
        Pending => "pending",
        Confirmed => "confirmed",
        Processing => "processing",
        Shipped => "shipped",
        Delivered => "delivered",
        Cancelled => "cancelled",
    }
);

string_enum!(
    PaymentMethod {
        Cod => "cod",
        SslCommerz => "sslcommerz",
    }
);

string_enum!(
    PaymentStatus {
        Pending => "pending",
        Paid => "paid",
        Failed => "failed",
        Cancelled => "cancelled",
    }
);

string_enum!(
    /// Slot of a subcategory page carousel.
    CarouselPosition {
        Left => "left",
        Middle => "middle",
        Right => "right",
    }
);

impl OrderStatus {
    /// Delivered and cancelled orders are final.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}
