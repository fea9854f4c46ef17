mod meta;
pub use self::meta::{Pagination, RequestInfo};

mod amendment;
pub use self::amendment::{
    AmendedAmendment, AmendedBill, AmendedTreaty, Amendment, AmendmentResponse, AmendmentType,
    AmendmentsResponse, CountRef, Cosponsors, LatestAction, Note, Notes, OnBehalfOfSponsor,
    Sponsor,
};
