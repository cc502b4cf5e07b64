use nutype::nutype;
use redb::TypeName;
use std::cmp::Ordering;
use std::str;

pub const MAX_IDENTIFIER_LENGTH: usize = 256;

/// Canonical product identifier, the storage lookup key.
///
/// This is the *validated* form used at the storage boundary. The resolver
/// itself stays total and hands back a plain `String`; conversion into a
/// `ProductIdentifier` is where blank payloads get rejected.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = MAX_IDENTIFIER_LENGTH),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        AsRef,
        Deref,
        TryFrom,
        Into,
        Hash,
        Borrow,
        Display,
        Serialize,
        Deserialize,
    )
)]
pub struct ProductIdentifier(String);

impl redb::Key for ProductIdentifier {
    fn compare(data1: &[u8], data2: &[u8]) -> Ordering {
        let s1 = str::from_utf8(data1).expect("invalid UTF-8 in identifier");
        let s2 = str::from_utf8(data2).expect("invalid UTF-8 in identifier");

        s1.cmp(s2)
    }
}

impl redb::Value for ProductIdentifier {
    type SelfType<'a> = Self;
    type AsBytes<'a> = &'a [u8];

    fn fixed_width() -> Option<usize> {
        None
    }

    fn from_bytes<'a>(data: &'a [u8]) -> Self::SelfType<'a>
    where
        Self: 'a,
    {
        let s = str::from_utf8(data).expect("invalid UTF-8 in identifier");
        Self::try_from(s).unwrap()
    }

    fn as_bytes<'a, 'b: 'a>(value: &'a Self::SelfType<'b>) -> Self::AsBytes<'a>
    where
        Self: 'b,
    {
        value.as_bytes()
    }

    fn type_name() -> TypeName {
        TypeName::new("galley::ProductIdentifier")
    }
}
