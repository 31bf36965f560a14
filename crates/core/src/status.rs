//! Lookup-table enums for seller statuses and properties.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding lookup table.

/// Lookup id type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_lookup_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database lookup id.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Seeded `name` column value.
            pub fn name(self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }

            /// Resolve a database id back to a variant.
            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( x if x == $val => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_lookup_enum! {
    /// Seller account status (`seller_statuses`).
    SellerStatus {
        /// Signed up, waiting for approval.
        Pending = 1 => "pending",
        Open = 2 => "open",
        Suspended = 3 => "suspended",
        ClosingPending = 4 => "closing_pending",
        Closed = 5 => "closed",
    }
}

define_lookup_enum! {
    /// Seller shop category (`seller_properties`).
    SellerProperty {
        ShoppingMall = 1 => "shopping_mall",
        Market = 2 => "market",
        RoadShop = 3 => "road_shop",
        DesignerBrand = 4 => "designer_brand",
        GeneralBrand = 5 => "general_brand",
        NationalBrand = 6 => "national_brand",
        Beauty = 7 => "beauty",
    }
}

/// Status every seller starts in at signup.
pub const INITIAL_SELLER_STATUS: SellerStatus = SellerStatus::Pending;
