//! US cities used to place seeded campgrounds.

/// A city with its coordinates.
#[derive(Debug, Clone, Copy)]
pub struct City {
    pub city: &'static str,
    pub state: &'static str,
    pub longitude: f64,
    pub latitude: f64,
}

const fn city(city: &'static str, state: &'static str, longitude: f64, latitude: f64) -> City {
    City {
        city,
        state,
        longitude,
        latitude,
    }
}

pub const CITIES: &[City] = &[
    city("New York", "New York", -74.005_941, 40.712_784),
    city("Los Angeles", "California", -118.243_685, 34.052_234),
    city("Chicago", "Illinois", -87.629_798, 41.878_114),
    city("Houston", "Texas", -95.369_803, 29.760_427),
    city("Philadelphia", "Pennsylvania", -75.165_222, 39.952_584),
    city("Phoenix", "Arizona", -112.074_037, 33.448_377),
    city("San Antonio", "Texas", -98.493_628, 29.424_122),
    city("San Diego", "California", -117.161_084, 32.715_738),
    city("Dallas", "Texas", -96.796_988, 32.776_664),
    city("San Jose", "California", -121.886_329, 37.338_208),
    city("Austin", "Texas", -97.743_061, 30.267_153),
    city("Indianapolis", "Indiana", -86.158_068, 39.768_403),
    city("Jacksonville", "Florida", -81.655_651, 30.332_184),
    city("San Francisco", "California", -122.419_416, 37.774_929),
    city("Columbus", "Ohio", -82.998_794, 39.961_176),
    city("Charlotte", "North Carolina", -80.843_127, 35.227_087),
    city("Fort Worth", "Texas", -97.330_766, 32.755_488),
    city("Detroit", "Michigan", -83.045_754, 42.331_427),
    city("El Paso", "Texas", -106.442_455, 31.761_878),
    city("Memphis", "Tennessee", -90.048_980, 35.149_534),
    city("Seattle", "Washington", -122.332_071, 47.606_209),
    city("Denver", "Colorado", -104.990_251, 39.739_236),
    city("Washington", "District of Columbia", -77.036_871, 38.907_192),
    city("Boston", "Massachusetts", -71.058_880, 42.360_082),
    city("Nashville", "Tennessee", -86.781_602, 36.162_664),
    city("Baltimore", "Maryland", -76.612_189, 39.290_385),
    city("Oklahoma City", "Oklahoma", -97.516_428, 35.467_560),
    city("Louisville", "Kentucky", -85.758_456, 38.252_665),
    city("Portland", "Oregon", -122.676_482, 45.523_062),
    city("Las Vegas", "Nevada", -115.139_830, 36.169_941),
    city("Milwaukee", "Wisconsin", -87.906_474, 43.038_902),
    city("Albuquerque", "New Mexico", -106.605_553, 35.084_386),
    city("Tucson", "Arizona", -110.974_711, 32.222_607),
    city("Fresno", "California", -119.787_125, 36.737_798),
    city("Sacramento", "California", -121.494_400, 38.581_572),
    city("Long Beach", "California", -118.193_739, 33.770_050),
    city("Kansas City", "Missouri", -94.578_567, 39.099_727),
    city("Mesa", "Arizona", -111.831_472, 33.415_184),
    city("Virginia Beach", "Virginia", -75.977_985, 36.852_926),
    city("Atlanta", "Georgia", -84.387_982, 33.748_995),
    city("Colorado Springs", "Colorado", -104.821_363, 38.833_882),
    city("Omaha", "Nebraska", -95.934_503, 41.256_537),
    city("Raleigh", "North Carolina", -78.638_179, 35.779_590),
    city("Miami", "Florida", -80.191_790, 25.761_680),
    city("Oakland", "California", -122.271_114, 37.804_364),
    city("Minneapolis", "Minnesota", -93.265_011, 44.977_753),
    city("Tulsa", "Oklahoma", -95.992_775, 36.153_982),
    city("Cleveland", "Ohio", -81.694_361, 41.499_320),
    city("Wichita", "Kansas", -97.330_053, 37.687_176),
    city("Arlington", "Texas", -97.108_066, 32.735_687),
    city("New Orleans", "Louisiana", -90.071_532, 29.951_066),
    city("Bakersfield", "California", -119.018_712, 35.373_292),
    city("Tampa", "Florida", -82.457_178, 27.950_575),
    city("Honolulu", "Hawaii", -157.858_333, 21.306_944),
    city("Aurora", "Colorado", -104.831_920, 39.729_432),
    city("Anaheim", "California", -117.914_299, 33.836_593),
    city("Santa Ana", "California", -117.867_653, 33.745_573),
    city("St. Louis", "Missouri", -90.199_404, 38.627_003),
    city("Riverside", "California", -117.375_494, 33.953_349),
    city("Corpus Christi", "Texas", -97.396_381, 27.800_583),
    city("Pittsburgh", "Pennsylvania", -79.995_886, 40.440_625),
    city("Lexington", "Kentucky", -84.503_716, 38.040_584),
    city("Anchorage", "Alaska", -149.900_278, 61.218_056),
    city("Stockton", "California", -121.290_780, 37.957_702),
    city("Cincinnati", "Ohio", -84.512_020, 39.103_118),
    city("St. Paul", "Minnesota", -93.089_958, 44.953_703),
    city("Toledo", "Ohio", -83.555_212, 41.663_938),
    city("Newark", "New Jersey", -74.172_367, 40.735_657),
    city("Greensboro", "North Carolina", -79.791_975, 36.072_635),
    city("Plano", "Texas", -96.698_886, 33.019_843),
    city("Henderson", "Nevada", -114.981_721, 36.039_525),
    city("Lincoln", "Nebraska", -96.681_679, 40.813_616),
    city("Buffalo", "New York", -78.878_369, 42.886_447),
    city("Fort Wayne", "Indiana", -85.139_352, 41.079_273),
    city("Jersey City", "New Jersey", -74.077_642, 40.728_158),
    city("Chula Vista", "California", -117.084_196, 32.640_054),
    city("Orlando", "Florida", -81.379_236, 28.538_335),
    city("St. Petersburg", "Florida", -82.640_291, 27.773_056),
    city("Norfolk", "Virginia", -76.285_873, 36.850_769),
    city("Chandler", "Arizona", -111.841_250, 33.306_160),
    city("Laredo", "Texas", -99.507_542, 27.530_567),
    city("Madison", "Wisconsin", -89.401_230, 43.073_052),
    city("Durham", "North Carolina", -78.898_619, 35.994_033),
    city("Lubbock", "Texas", -101.855_166, 33.577_863),
    city("Winston-Salem", "North Carolina", -80.244_216, 36.099_860),
    city("Garland", "Texas", -96.638_883, 32.912_624),
    city("Glendale", "Arizona", -112.185_987, 33.538_652),
    city("Hialeah", "Florida", -80.278_106, 25.857_596),
    city("Reno", "Nevada", -119.813_803, 39.529_633),
    city("Baton Rouge", "Louisiana", -91.187_147, 30.458_283),
    city("Irvine", "California", -117.794_694, 33.683_947),
    city("Chesapeake", "Virginia", -76.287_493, 36.768_209),
    city("Irving", "Texas", -96.948_891, 32.814_018),
    city("Scottsdale", "Arizona", -111.926_052, 33.494_170),
    city("North Las Vegas", "Nevada", -115.117_501, 36.198_859),
    city("Fremont", "California", -121.988_571, 37.548_270),
    city("Gilbert", "Arizona", -111.789_027, 33.352_826),
    city("San Bernardino", "California", -117.289_765, 34.108_345),
    city("Boise", "Idaho", -116.214_607, 43.618_710),
    city("Birmingham", "Alabama", -86.802_490, 33.520_661),
    city("Rochester", "New York", -77.610_922, 43.156_578),
    city("Richmond", "Virginia", -77.436_048, 37.540_725),
    city("Spokane", "Washington", -117.426_047, 47.658_780),
    city("Des Moines", "Iowa", -93.609_106, 41.600_545),
    city("Montgomery", "Alabama", -86.299_969, 32.366_805),
    city("Salt Lake City", "Utah", -111.891_047, 40.760_779),
    city("Tacoma", "Washington", -122.444_291, 47.252_877),
    city("Little Rock", "Arkansas", -92.289_595, 34.746_481),
    city("Knoxville", "Tennessee", -83.920_739, 35.960_638),
    city("Providence", "Rhode Island", -71.412_834, 41.823_989),
    city("Chattanooga", "Tennessee", -85.309_680, 35.045_630),
    city("Fort Collins", "Colorado", -105.084_423, 40.585_260),
    city("Eugene", "Oregon", -123.086_754, 44.052_069),
    city("Bend", "Oregon", -121.315_310, 44.058_173),
    city("Flagstaff", "Arizona", -111.651_299, 35.198_284),
    city("Missoula", "Montana", -113.993_996, 46.872_131),
    city("Billings", "Montana", -108.500_690, 45.783_286),
    city("Cheyenne", "Wyoming", -104.820_246, 41.139_981),
    city("Santa Fe", "New Mexico", -105.937_799, 35.686_975),
    city("Asheville", "North Carolina", -82.551_487, 35.595_058),
    city("Burlington", "Vermont", -73.212_072, 44.475_882),
    city("Portland", "Maine", -70.255_325, 43.659_099),
    city("Duluth", "Minnesota", -92.100_485, 46.786_672),
    city("Rapid City", "South Dakota", -103.231_015, 44.080_543),
    city("Fargo", "North Dakota", -96.789_803, 46.877_186),
    city("Juneau", "Alaska", -134.419_740, 58.301_935),
];
