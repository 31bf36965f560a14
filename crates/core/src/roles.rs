//! Role names carried in access tokens.

/// Back-office administrator (`is_master` on the active snapshot).
pub const ROLE_MASTER: &str = "master";

/// A seller managing its own profile.
pub const ROLE_SELLER: &str = "seller";

/// Role granted at sign-in.
pub fn role_for(is_master: bool) -> &'static str {
    if is_master {
        ROLE_MASTER
    } else {
        ROLE_SELLER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn master_flag_selects_role() {
        assert_eq!(role_for(true), "master");
        assert_eq!(role_for(false), "seller");
    }
}
