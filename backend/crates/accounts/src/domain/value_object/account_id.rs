use kernel::id::Id;

pub struct AccountMarker;
pub type AccountId = Id<AccountMarker>;

pub struct ProfileMarker;
pub type ProfileId = Id<ProfileMarker>;
