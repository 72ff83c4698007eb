#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(usize)]
pub(crate) enum Site {
    Geocode,
    GeoSniff,
    StreetView,
}
