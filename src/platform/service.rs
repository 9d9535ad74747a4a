use crate::error::SwitcherResult;
use crate::guard::Subsystem;
use crate::platform::types::{ProfileId, ProfileRecord};

/// The platform's network-configuration service.
///
/// Calls block until the platform answers. `initialize`/`finalize` come from
/// [`Subsystem`] and are only ever driven through a
/// [`SharedSubsystem`](crate::guard::SharedSubsystem).
pub trait NetConfig: Subsystem {
    fn record_exists(&self, id: ProfileId) -> SwitcherResult<bool>;

    fn read_record(&self, id: ProfileId) -> SwitcherResult<ProfileRecord>;

    /// Bring up the connection described by slot `id`
    fn connect(&self, id: ProfileId) -> SwitcherResult<()>;

    /// Tear down every active connection
    fn disconnect_all(&self) -> SwitcherResult<()>;

    /// Raw boot id; `0` means unset.
    fn default_boot_id(&self) -> SwitcherResult<u8>;

    fn set_default_boot_id(&self, id: ProfileId) -> SwitcherResult<()>;

    /// Raw compatibility-mode boot id; `0` means unset.
    fn secondary_boot_id(&self) -> SwitcherResult<u8>;

    fn set_secondary_boot_id(&self, id: ProfileId) -> SwitcherResult<()>;
}
