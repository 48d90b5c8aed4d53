//! Member Data

use crate::domain::members::records::MemberUuid;

/// New Member Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewMember {
    pub uuid: MemberUuid,
    pub name: String,
    pub mileage: u64,
}
