/// Channel type used for every channel the app creates.
pub const MESSAGING_CHANNEL_TYPE: &str = "messaging";

/// The shared channel every signed-in user joins.
pub const EVERYONE_CHANNEL_ID: &str = "everyone";
pub const EVERYONE_CHANNEL_NAME: &str = "Everyone Chat";

/// Channel id for a 1-on-1 conversation. Both participants derive the same
/// id independently: the pair is sorted before joining.
pub fn direct_channel_id(a: &str, b: &str) -> String {
    if a <= b {
        format!("{}-{}", a, b)
    } else {
        format!("{}-{}", b, a)
    }
}
