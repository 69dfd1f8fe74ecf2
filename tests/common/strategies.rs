//! Proptest strategies shared across property-based tests.

use proptest::prelude::*;
use roster_client::DatePolicy;

/// Either date policy, equally weighted.
pub fn date_policy_strategy() -> impl Strategy<Value = DatePolicy> {
    prop_oneof![Just(DatePolicy::OffsetShift), Just(DatePolicy::Truncate)]
}
