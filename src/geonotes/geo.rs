//! Country derivation from coordinates.
//!
//! Notes carry a `country` that is derived from their coordinates when the
//! caller does not supply one. The lookup itself sits behind
//! [`CountryResolver`] so deployments can plug in a full reverse geocoder.
//! [`NearestCapital`] is the built-in offline resolver: it picks the country
//! whose reference point (its capital) is closest on the great circle.

/// Resolves an ISO 3166-1 alpha-2 country code for a coordinate pair.
pub trait CountryResolver {
    fn country_code(&self, lat: f64, long: f64) -> Option<String>;
}

/// Resolver that never answers; notes keep whatever country they were given.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCountry;

impl CountryResolver for NoCountry {
    fn country_code(&self, _lat: f64, _long: f64) -> Option<String> {
        None
    }
}

const EARTH_RADIUS_KM: f64 = 6371.0;

/// (country code, latitude, longitude) of each country's capital.
const REFERENCE_POINTS: &[(&str, f64, f64)] = &[
    ("AE", 24.4539, 54.3773),
    ("AF", 34.5553, 69.2075),
    ("AM", 40.1792, 44.4991),
    ("AR", -34.6037, -58.3816),
    ("AT", 48.2082, 16.3738),
    ("AU", -35.2809, 149.1300),
    ("AZ", 40.4093, 49.8671),
    ("BD", 23.8103, 90.4125),
    ("BE", 50.8503, 4.3517),
    ("BR", -15.7939, -47.8828),
    ("CA", 45.4215, -75.6972),
    ("CH", 46.9480, 7.4474),
    ("CL", -33.4489, -70.6693),
    ("CN", 39.9042, 116.4074),
    ("CO", 4.7110, -74.0721),
    ("CZ", 50.0755, 14.4378),
    ("DE", 52.5200, 13.4050),
    ("DK", 55.6761, 12.5683),
    ("DZ", 36.7538, 3.0588),
    ("EG", 30.0444, 31.2357),
    ("ES", 40.4168, -3.7038),
    ("ET", 9.0300, 38.7400),
    ("FI", 60.1699, 24.9384),
    ("FR", 48.8566, 2.3522),
    ("GB", 51.5074, -0.1278),
    ("GE", 41.7151, 44.8271),
    ("GR", 37.9838, 23.7275),
    ("HU", 47.4979, 19.0402),
    ("ID", -6.2088, 106.8456),
    ("IE", 53.3498, -6.2603),
    ("IN", 28.6139, 77.2090),
    ("IQ", 33.3152, 44.3661),
    ("IR", 35.6892, 51.3890),
    ("IS", 64.1466, -21.9426),
    ("IT", 41.9028, 12.4964),
    ("JP", 35.6762, 139.6503),
    ("KE", -1.2921, 36.8219),
    ("KR", 37.5665, 126.9780),
    ("KZ", 51.1694, 71.4491),
    ("MA", 34.0209, -6.8416),
    ("MX", 19.4326, -99.1332),
    ("MY", 3.1390, 101.6869),
    ("NG", 9.0765, 7.3986),
    ("NL", 52.3676, 4.9041),
    ("NO", 59.9139, 10.7522),
    ("NZ", -41.2865, 174.7762),
    ("PE", -12.0464, -77.0428),
    ("PH", 14.5995, 120.9842),
    ("PK", 33.6844, 73.0479),
    ("PL", 52.2297, 21.0122),
    ("PT", 38.7223, -9.1393),
    ("RO", 44.4268, 26.1025),
    ("RU", 55.7558, 37.6173),
    ("SA", 24.7136, 46.6753),
    ("SE", 59.3293, 18.0686),
    ("SG", 1.3521, 103.8198),
    ("TH", 13.7563, 100.5018),
    ("TM", 37.9601, 58.3261),
    ("TR", 39.9334, 32.8597),
    ("UA", 50.4501, 30.5234),
    ("US", 38.9072, -77.0369),
    ("UZ", 41.2995, 69.2401),
    ("VE", 10.4806, -66.9036),
    ("VN", 21.0278, 105.8342),
    ("ZA", -25.7479, 28.2293),
];

/// Offline resolver choosing the country with the nearest reference point.
#[derive(Debug, Default, Clone, Copy)]
pub struct NearestCapital;

impl CountryResolver for NearestCapital {
    fn country_code(&self, lat: f64, long: f64) -> Option<String> {
        if !lat.is_finite() || !long.is_finite() {
            return None;
        }
        REFERENCE_POINTS
            .iter()
            .map(|(code, ref_lat, ref_long)| (code, haversine_km(lat, long, *ref_lat, *ref_long)))
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(code, _)| code.to_string())
    }
}

/// Great-circle distance between two coordinates in kilometres.
pub fn haversine_km(lat1: f64, long1: f64, lat2: f64, long2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_long = (long2 - long1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_long / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}
