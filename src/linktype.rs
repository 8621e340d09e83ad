use rusticata_macros::newtype_enum;

/// Data link type
///
/// The link-layer header type declared by an Interface Description Block.
///
/// See <http://www.tcpdump.org/linktypes.html>
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Linktype(pub u16);

newtype_enum! {
impl display Linktype {
    NULL = 0,
    ETHERNET = 1,

    RAW = 101,

    IEEE802_11 = 105,
    LOOP = 108,
    LINUX_SLL = 113,
}
}
