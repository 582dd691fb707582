/// Smallest authenticator nonce UAF allows, in bytes.
pub const MIN_NONCE_LEN: usize = 8;

/// User verified through the authenticator's own method.
pub const MODE_USER_VERIFIED: u8 = 0x01;
/// Transaction content was shown to the user and confirmed.
pub const MODE_TRANSACTION_CONFIRMED: u8 = 0x02;

/// Properties of the emulated authenticator that end up inside every assertion.
///
/// ```
/// use uaf_authenticator::AuthenticatorProfile;
///
/// let profile = AuthenticatorProfile::default()
///     .sign_counter(12)
///     .nonce_len(16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatorProfile {
    pub(crate) authenticator_version: u16,
    pub(crate) authentication_mode: u8,
    pub(crate) sign_counter: u32,
    pub(crate) reg_counter: u32,
    pub(crate) nonce_len: usize,
}

impl Default for AuthenticatorProfile {
    fn default() -> Self {
        Self {
            authenticator_version: 1,
            authentication_mode: MODE_USER_VERIFIED,
            sign_counter: 0,
            reg_counter: 0,
            nonce_len: MIN_NONCE_LEN,
        }
    }
}

impl AuthenticatorProfile {
    /// Vendor assigned authenticator version written in `TAG_ASSERTION_INFO`.
    pub fn authenticator_version(mut self, version: u16) -> Self {
        self.authenticator_version = version;
        self
    }

    /// Authentication mode used when no transaction is confirmed.
    pub fn authentication_mode(mut self, mode: u8) -> Self {
        self.authentication_mode = mode;
        self
    }

    /// Signature counter reported in `TAG_COUNTERS`.
    pub fn sign_counter(mut self, counter: u32) -> Self {
        self.sign_counter = counter;
        self
    }

    /// Registration counter reported in registration `TAG_COUNTERS`.
    pub fn reg_counter(mut self, counter: u32) -> Self {
        self.reg_counter = counter;
        self
    }

    /// Length of the authenticator nonce, raised to [`MIN_NONCE_LEN`] when smaller.
    pub fn nonce_len(mut self, len: usize) -> Self {
        self.nonce_len = len.max(MIN_NONCE_LEN);
        self
    }
}
