//! Name/value lookup tables for the GIOP/IOP enumerations, mirroring the
//! original `ColiMap` tables (`coliToName`/`coliToNumber`; see
//! `SPEC_FULL.md` §4.3.1). These are diagnostic/tooling surface, not
//! wire format: nothing in the codec layer consults them.

/// One entry of a lookup table: an enumerated value and its name.
pub type Entry = (i64, &'static str);

/// GIOP message types (see [`crate::message::MessageType`]).
pub const GIOP_MSG_TYPE: &[Entry] = &[(0, "Request"),
                                      (1, "Reply"),
                                      (2, "CancelRequest"),
                                      (3, "LocateRequest"),
                                      (4, "LocateReply"),
                                      (5, "CloseConnection"),
                                      (6, "MessageError"),
                                      (7, "Fragment")];

/// Reply status codes (see [`crate::request_reply::ReplyStatus`]).
pub const REPLY_STATUS: &[Entry] = &[(0, "NO_EXCEPTION"),
                                     (1, "USER_EXCEPTION"),
                                     (2, "SYSTEM_EXCEPTION"),
                                     (3, "LOCATION_FORWARD"),
                                     (4, "LOCATION_FORWARD_PERM"),
                                     (5, "NEEDS_ADDRESSING_MODE")];

/// Well-known `TaggedComponent` IDs.
pub const COMPONENT_ID: &[Entry] = &[(0, "TAG_ORB_TYPE"),
                                     (1, "TAG_CODE_SETS"),
                                     (2, "TAG_POLICIES"),
                                     (5, "TAG_ALTERNATE_IIOP_ADDRESS"),
                                     (6, "TAG_ASSOCIATION_OPTIONS"),
                                     (33, "TAG_SSL_SEC_TRANS")];

/// Well-known `TaggedProfile` IDs.
pub const PROFILE_ID: &[Entry] = &[(0, "TAG_INTERNET_IOP"), (1, "TAG_MULTIPLE_COMPONENTS")];

/// Well-known `ServiceContext` IDs.
pub const SERVICE_ID: &[Entry] = &[(0, "TransactionService"),
                                   (1, "CodeSets"),
                                   (6, "SecurityLevel2"),
                                   (15, "SASContext")];

/// `CONV_FRAME::CodeSetId` well-known values.
pub const CODE_SET_ID: &[Entry] = &[(0x0001_0001, "ISO8859-1"),
                                    (0x0501_0001, "UTF-8"),
                                    (0x0001_0100, "UCS-2"),
                                    (0x0001_0109, "UTF-16")];

/// `Messaging::SyncScope` values (see
/// [`crate::request_reply::SyncScope`]).
pub const SYNC_SCOPE: &[Entry] =
  &[(0, "SYNC_NONE"), (1, "SYNC_WITH_TRANSPORT"), (2, "SYNC_WITH_SERVER"), (3, "SYNC_WITH_TARGET")];

/// `IIOP::AssociationOptions` bit flags.
pub const ASSOCIATION_OPTIONS: &[Entry] = &[(1, "NoProtection"),
                                            (2, "Integrity"),
                                            (4, "Confidentiality"),
                                            (8, "DetectReplay"),
                                            (16, "DetectMisordering"),
                                            (32, "EstablishTrustInTarget"),
                                            (64, "EstablishTrustInClient"),
                                            (128, "NoDelegation"),
                                            (256, "SimpleDelegation"),
                                            (512, "CompositeDelegation")];

/// `GIOP::AddressingDisposition` values (see
/// [`crate::request_reply::TargetAddress`]).
pub const ADDRESSING_DISPOSITION: &[Entry] =
  &[(0, "KeyAddr"), (1, "ProfileAddr"), (2, "ReferenceAddr")];

/// Look up `number`'s name in `table`. Mirrors the original `coliToName`.
pub fn to_name(table: &[Entry], number: i64) -> Option<&'static str> {
  table.iter().find(|(n, _)| *n == number).map(|(_, name)| *name)
}

/// Look up `name`'s numeric value in `table`. If `partial` is true, the
/// first entry whose name *contains* `name` anywhere matches, mirroring
/// the original `coliToNumber`'s `strstr`-based partial-match mode;
/// otherwise the match is a case-insensitive exact comparison, mirroring
/// its `strcasecmp`-based exact mode.
pub fn to_number(table: &[Entry], name: &str, partial: bool) -> Option<i64> {
  table.iter()
       .find(|(_, n)| if partial { n.contains(name) } else { n.eq_ignore_ascii_case(name) })
       .map(|(num, _)| *num)
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn name_and_number_roundtrip_every_entry() {
    for table in [GIOP_MSG_TYPE, REPLY_STATUS, COMPONENT_ID, PROFILE_ID, SERVICE_ID, CODE_SET_ID,
                  SYNC_SCOPE] {
      for (num, name) in table {
        assert_eq!(to_name(table, *num), Some(*name));
        assert_eq!(to_number(table, name, false), Some(*num));
      }
    }
  }

  #[test]
  fn partial_match() {
    assert_eq!(to_number(REPLY_STATUS, "SYSTEM", true), Some(2));
    assert_eq!(to_number(REPLY_STATUS, "SYSTEM", false), None);
  }

  #[test]
  fn partial_match_is_substring_not_prefix() {
    // "UTF-16" only appears mid-name in real ORBs' longer descriptive
    // strings; a prefix-only match would miss this, so this checks the
    // same substring behavior against our own (shorter) table entry.
    assert_eq!(to_number(CODE_SET_ID, "UTF-16", true), Some(0x0001_0109));
    assert_eq!(to_number(CODE_SET_ID, "UTF-8", true), Some(0x0501_0001));
  }

  #[test]
  fn exact_match_is_case_insensitive() {
    assert_eq!(to_number(REPLY_STATUS, "no_exception", false), Some(0));
    assert_eq!(to_number(REPLY_STATUS, "No_Exception", false), Some(0));
  }

  #[test]
  fn unknown_name_or_number() {
    assert_eq!(to_name(REPLY_STATUS, 999), None);
    assert_eq!(to_number(REPLY_STATUS, "nonsense", false), None);
  }
}
