//! Member Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Member UUID
pub type MemberUuid = TypedUuid<MemberRecord>;

/// Member Record
///
/// Local copy of the user's mileage balance so that debits join the
/// checkout transaction.
#[derive(Debug, Clone)]
pub struct MemberRecord {
    pub uuid: MemberUuid,
    pub name: String,
    pub mileage: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
