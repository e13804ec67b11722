//! Wires a container against a parsed properties source.

use rivet_config::PropertiesFile;
use rivet_di::{Blueprint, ContainerBuilder, Late};

struct HttpSettings {
    host: Late<String>,
    port: Late<u16>,
    timeout_ms: Late<i64>,
}

#[test]
fn parsed_properties_feed_value_injection() {
    let source = PropertiesFile::parse("http.host=0.0.0.0\nhttp.port=9090\ntimeout_ms=250");

    let container = ContainerBuilder::new()
        .add_blueprint(
            Blueprint::component::<HttpSettings>("http")
                .constructor(&[], |_| {
                    Ok(HttpSettings {
                        host: Late::unset(),
                        port: Late::unset(),
                        timeout_ms: Late::unset(),
                    })
                })
                .value_keyed("http.host", "host", |settings: &HttpSettings, value: String| {
                    settings.host.fill(value).map_err(Into::into)
                })
                .value_keyed("http.port", "port", |settings: &HttpSettings, value: u16| {
                    settings.port.fill(value).map_err(Into::into)
                })
                .value("timeout_ms", |settings: &HttpSettings, value: i64| {
                    settings.timeout_ms.fill(value).map_err(Into::into)
                })
                .build()
                .unwrap(),
        )
        .with_property_source(source)
        .build()
        .unwrap();

    let settings = container.get_by_type::<HttpSettings>().unwrap();
    assert_eq!(settings.host.get(), "0.0.0.0");
    assert_eq!(*settings.port.get(), 9090);
    assert_eq!(*settings.timeout_ms.get(), 250);
}
