use std::collections::HashMap;

/// One exposed field of a flat record of unsigned counters.
pub struct Field<R> {
    /// Mixed-case identifier the metric name is derived from.
    pub identifier: &'static str,
    /// Reads the field's current value out of a record.
    pub value: fn(&R) -> u64,
}

/// A flat record type whose fields are exposed as individual metrics.
///
/// `FIELDS` lists every field in declaration order, which is also the order
/// samples are emitted in. Implementations are normally generated with
/// [`record!`](crate::record).
pub trait Record: Default + Sized + Send + Sync + 'static {
    const FIELDS: &'static [Field<Self>];

    /// Assigns `value` to the field with the given kernel key. Returns `false`
    /// if the key does not belong to this record.
    fn set(&mut self, key: &str, value: u64) -> bool;
}

/// One read of every node's record, keyed by node id.
pub type Snapshot<R> = HashMap<usize, R>;

/// Declares a record struct of `u64` counters and implements [`Record`] for it.
///
/// Each entry pairs the mixed-case identifier the metric name is derived from
/// with the struct field, whose name doubles as the key in the kernel file.
///
/// ```ignore
/// record! {
///     pub struct NodeNumaStat {
///         NumaHit => numa_hit,
///         NumaMiss => numa_miss,
///     }
/// }
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $($identifier:ident => $field:ident),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
        $vis struct $name {
            $(pub $field: u64,)*
        }

        impl $crate::metrics::Record for $name {
            const FIELDS: &'static [$crate::metrics::Field<Self>] = &[
                $($crate::metrics::Field {
                    identifier: stringify!($identifier),
                    value: |record: &$name| record.$field,
                },)*
            ];

            fn set(&mut self, key: &str, value: u64) -> bool {
                match key {
                    $(stringify!($field) => self.$field = value,)*
                    _ => return false,
                }

                true
            }
        }
    };
}
