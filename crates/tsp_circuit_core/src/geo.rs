use std::fmt;

const EARTH_RADIUS_M: f64 = 6_371_000.0;
const NINETY: f64 = 90.0;
const ONE_EIGHTY: f64 = NINETY * 2.0;

/// Geographic position of a vertex, in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Datasets without coordinates load every vertex at `(0, 0)`.
    pub fn is_origin(self) -> bool {
        self.lon == 0.0 && self.lat == 0.0
    }

    /// Great-circle distance in meters. Two origin points are 0 apart so
    /// graphs lacking coordinates never pick up phantom distances.
    pub fn haversine(self, rhs: Self) -> f64 {
        if self.is_origin() && rhs.is_origin() {
            return 0.0;
        }

        let (lat1, lat2) = (self.lat.to_radians(), rhs.lat.to_radians());
        let dlat = (rhs.lat - self.lat).to_radians();
        let dlon = (rhs.lon - self.lon).to_radians();
        let s1 = (dlat / 2.0).sin();
        let s2 = (dlon / 2.0).sin();
        let h = s1 * s1 + lat1.cos() * lat2.cos() * s2 * s2;
        2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
    }

    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-NINETY..=NINETY).contains(&self.lat)
            && (-ONE_EIGHTY..=ONE_EIGHTY).contains(&self.lon)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut b1 = ryu::Buffer::new();
        let mut b2 = ryu::Buffer::new();
        write!(f, "{},{}", b1.format(self.lon), b2.format(self.lat))
    }
}
