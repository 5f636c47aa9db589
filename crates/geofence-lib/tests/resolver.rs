use std::io::Write;
use std::net::IpAddr;

use geofence_lib::{CountryResolver, MaxMindResolver};

fn sample_ip() -> IpAddr {
    "8.8.8.8".parse().unwrap()
}

#[test]
fn missing_database_file_is_an_error() {
    let resolver = MaxMindResolver::new("/nonexistent/geoipCountries.mmdb");
    assert!(resolver.country_of(sample_ip()).is_err());
}

#[test]
fn corrupt_database_file_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"this is not a maxmind database").unwrap();
    file.flush().unwrap();

    let resolver = MaxMindResolver::new(file.path());
    assert!(resolver.country_of(sample_ip()).is_err());
}

#[test]
fn resolver_keeps_the_configured_path() {
    let resolver = MaxMindResolver::new("data/geoipCountries.mmdb");
    assert_eq!(
        resolver.path().to_str().unwrap(),
        "data/geoipCountries.mmdb"
    );
}

#[test]
fn resolver_reports_its_name() {
    let resolver = MaxMindResolver::new("data/geoipCountries.mmdb");
    assert_eq!(resolver.name(), "MaxMind");
}
