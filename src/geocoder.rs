//! Search and reverse lookups, from command arguments to printed report.

use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::Duration;
use thiserror::Error;

use crate::api::{ApiError, NominatimClient, Transport, open_in_josm};
use crate::config::Config;
use crate::geometry::point::CoordinateError;
use crate::geometry::{Point, parse_coordinate};
use crate::links::Links;
use crate::report::{GroupedReport, PlaceEntry, ReverseReport};

#[derive(Debug, Error)]
pub enum UsageError {
    #[error("search query required")]
    MissingQuery,

    #[error("latitude longitude required")]
    MissingCoordinates,

    #[error("invalid coordinate: {0}")]
    Coordinate(#[from] CoordinateError),
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error(transparent)]
    Usage(#[from] UsageError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("no results found for {0:?}")]
    NotFound(String),

    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Parsed arguments of a reverse lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct ReverseRequest {
    pub point: Point,
    /// Load the area in JOSM after printing.
    pub open_editor: bool,
}

impl ReverseRequest {
    /// `<lat> <lon> [anything]`. The third token only marks that JOSM
    /// should be triggered; its value is ignored.
    pub fn parse(args: &[String]) -> Result<Self, UsageError> {
        let [lat, lon, rest @ ..] = args else {
            return Err(UsageError::MissingCoordinates);
        };

        Ok(Self {
            point: Point::new(parse_coordinate(lat)?, parse_coordinate(lon)?),
            open_editor: !rest.is_empty(),
        })
    }
}

/// Join command words into a single trimmed query.
pub fn search_query(words: &[String]) -> Result<String, UsageError> {
    let query = words.join(" ").trim().to_string();
    if query.is_empty() {
        return Err(UsageError::MissingQuery);
    }
    Ok(query)
}

pub struct Geocoder<'a, T> {
    transport: &'a T,
    nominatim: NominatimClient<'a, T>,
    links: Links,
    progress: bool,
}

impl<'a, T: Transport> Geocoder<'a, T> {
    pub fn new(transport: &'a T, config: &'a Config) -> Self {
        Self {
            transport,
            nominatim: NominatimClient::new(transport, &config.nominatim.url),
            links: Links::new(config),
            progress: false,
        }
    }

    /// Show a spinner on stderr while waiting for Nominatim.
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.progress = enabled;
        self
    }

    pub fn search(&self, query: &str) -> Result<GroupedReport, LookupError> {
        let spinner = self.spinner(format!("Searching Nominatim for {:?}...", query));
        let places = self.nominatim.search(query);
        spinner.finish_and_clear();

        let report = GroupedReport::from_places(&places?, &self.links);
        log::debug!("{} result(s) for {:?}", report.len(), query);
        if report.is_empty() {
            return Err(LookupError::NotFound(query.to_string()));
        }

        Ok(report)
    }

    /// Links are derived from `point` itself, not from the coordinates
    /// Nominatim echoes back for the matched object.
    pub fn reverse(&self, point: Point) -> Result<ReverseReport, LookupError> {
        let spinner = self.spinner(format!("Looking up {}...", point));
        let place = self.nominatim.reverse(point);
        spinner.finish_and_clear();

        let place = place?;
        let (view_url, edit_url) = self.links.for_point(point);

        Ok(ReverseReport {
            category: place.category,
            type_: place.type_,
            entry: PlaceEntry {
                name: place.display_name,
                view_url,
                edit_url,
            },
        })
    }

    pub fn open_in_editor(&self, url: &str) -> Result<(), LookupError> {
        open_in_josm(self.transport, url)?;
        log::info!("Loaded area in JOSM");
        Ok(())
    }

    /// `s <query...>`: print the grouped report for a free-text query.
    pub fn run_search<W: Write>(&self, words: &[String], out: &mut W) -> Result<(), LookupError> {
        let query = search_query(words)?;
        let report = self.search(&query)?;
        write!(out, "{}", report)?;
        Ok(())
    }

    /// `r <lat> <lon> [open]`: print the place at a point, then optionally
    /// load its surroundings in JOSM.
    pub fn run_reverse<W: Write>(&self, args: &[String], out: &mut W) -> Result<(), LookupError> {
        let request = ReverseRequest::parse(args)?;
        let report = self.reverse(request.point)?;
        writeln!(out, "{}", report)?;
        out.flush()?;

        if request.open_editor {
            self.open_in_editor(&report.entry.edit_url)?;
        }
        Ok(())
    }

    fn spinner(&self, message: String) -> ProgressBar {
        if !self.progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
            pb.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
        }
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::FakeTransport;

    const SEARCH_BODY: &str = r#"[
        {"lat":"48.8606","lon":"2.3376","category":"tourism","type":"museum",
         "display_name":"Louvre Museum, Paris"},
        {"lat":"48.8611","lon":"2.3364","category":"amenity","type":"cafe",
         "display_name":"Cafe Marly, Paris"},
        {"lat":"48.8620","lon":"2.3390","category":"amenity","type":"restaurant",
         "display_name":"Le Grand Vefour, Paris"}
    ]"#;

    const REVERSE_BODY: &str = r#"{"lat":"51.5033635","lon":"-0.1276248",
        "category":"building","type":"yes","display_name":"10 Downing Street, London"}"#;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn run_search(transport: &FakeTransport, words: &[&str]) -> (Result<(), LookupError>, String) {
        let config = Config::default();
        let geocoder = Geocoder::new(transport, &config);
        let mut out = Vec::new();
        let result = geocoder.run_search(&args(words), &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    fn run_reverse(transport: &FakeTransport, words: &[&str]) -> (Result<(), LookupError>, String) {
        let config = Config::default();
        let geocoder = Geocoder::new(transport, &config);
        let mut out = Vec::new();
        let result = geocoder.run_reverse(&args(words), &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_reverse_request_parse() {
        let request = ReverseRequest::parse(&args(&["51.5 N", "-0.12W"])).unwrap();
        assert_eq!(request.point, Point::new(51.5, -0.12));
        assert!(!request.open_editor);

        let request = ReverseRequest::parse(&args(&["1", "2", "josm"])).unwrap();
        assert!(request.open_editor);
    }

    #[test]
    fn test_reverse_request_invalid() {
        assert!(matches!(
            ReverseRequest::parse(&args(&["51.5"])),
            Err(UsageError::MissingCoordinates)
        ));
        assert!(matches!(
            ReverseRequest::parse(&args(&["51.5", "east"])),
            Err(UsageError::Coordinate(_))
        ));
    }

    #[test]
    fn test_search_query() {
        assert_eq!(search_query(&args(&["  Speyer  "])).unwrap(), "Speyer");
        assert_eq!(search_query(&args(&["Kaiserdom", "Speyer"])).unwrap(), "Kaiserdom Speyer");
        assert!(matches!(search_query(&args(&[" "])), Err(UsageError::MissingQuery)));
        assert!(matches!(search_query(&[]), Err(UsageError::MissingQuery)));
    }

    #[test]
    fn test_search_prints_grouped_report() {
        let transport = FakeTransport::new().respond(200, SEARCH_BODY);
        let (result, out) = run_search(&transport, &["  louvre  "]);

        assert!(result.is_ok());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "tourism");
        assert_eq!(lines[1], "  museum");
        assert!(lines[2].starts_with("    Louvre Museum, Paris, view on OSM: <https://www.openstreetmap.org/?mlat=48.8606&mlon=2.3376&zoom=17/48.8606/2.3376>"));
        assert_eq!(lines[3], "amenity");
        assert_eq!(lines[4], "  cafe");
        assert_eq!(lines[6], "  restaurant");
        assert!(lines[7].starts_with("    Le Grand Vefour, Paris, "));

        let requests = transport.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].1[1], ("q".to_string(), "louvre".to_string()));
    }

    #[test]
    fn test_search_editor_links_use_place_bbox() {
        let transport = FakeTransport::new().respond(200, SEARCH_BODY);
        let config = Config::default();
        let geocoder = Geocoder::new(&transport, &config);

        let report = geocoder.search("louvre").unwrap();
        let entry = &report.categories()[0].types[0].places[0];
        assert_eq!(
            entry.edit_url,
            format!(
                "http://localhost:8111/load_and_zoom?top={}&bottom={}&left={}&right={}",
                48.8606 + 0.005,
                48.8606 - 0.005,
                2.3376 - 0.005,
                2.3376 + 0.005
            )
        );
    }

    #[test]
    fn test_search_no_results() {
        let transport = FakeTransport::new().respond(200, "[]");
        let (result, out) = run_search(&transport, &["atlantis"]);

        assert!(matches!(result, Err(LookupError::NotFound(ref q)) if q == "atlantis"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_search_http_error() {
        let transport = FakeTransport::new().respond(503, "");
        let (result, out) = run_search(&transport, &["paris"]);

        let err = result.unwrap_err();
        assert_eq!(
            err.to_string(),
            "GET https://nominatim.openstreetmap.org/search error: 503"
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_search_without_query_makes_no_request() {
        let transport = FakeTransport::new();
        let (result, _) = run_search(&transport, &[]);

        assert!(matches!(result, Err(LookupError::Usage(UsageError::MissingQuery))));
        assert!(transport.requests.borrow().is_empty());
    }

    #[test]
    fn test_reverse_single_coordinate_makes_no_request() {
        let transport = FakeTransport::new();
        let (result, out) = run_reverse(&transport, &["51.5"]);

        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "latitude longitude required");
        assert!(out.is_empty());
        assert!(transport.requests.borrow().is_empty());
    }

    #[test]
    fn test_reverse_prints_line_with_input_coordinates() {
        let transport = FakeTransport::new().respond(200, REVERSE_BODY);
        let (result, out) = run_reverse(&transport, &["51.5034", "-0.1276"]);

        assert!(result.is_ok());
        // The provider echoed 51.5033635/-0.1276248; links keep the input.
        assert_eq!(
            out,
            format!(
                "building/yes 10 Downing Street, London, view on OSM: <https://www.openstreetmap.org/?mlat=51.5034&mlon=-0.1276&zoom=17/51.5034/-0.1276>, edit in JOSM: <http://localhost:8111/load_and_zoom?top={}&bottom={}&left={}&right={}>\n",
                51.5034 + 0.005,
                51.5034 - 0.005,
                -0.1276 - 0.005,
                -0.1276 + 0.005
            )
        );
        assert_eq!(transport.urls().len(), 1);
    }

    #[test]
    fn test_reverse_whole_degree_coordinates() {
        let transport = FakeTransport::new().respond(200, REVERSE_BODY);
        let (result, out) = run_reverse(&transport, &["52", "13"]);

        assert!(result.is_ok());
        assert!(out.contains("<https://www.openstreetmap.org/?mlat=52.0&mlon=13.0&zoom=17/52.0/13.0>"));
        let requests = transport.requests.borrow();
        assert_eq!(requests[0].1[1], ("lat".to_string(), "52.0".to_string()));
    }

    #[test]
    fn test_reverse_hyphenated_tokens() {
        let transport = FakeTransport::new()
            .respond(200, REVERSE_BODY)
            .respond(200, "ok");
        let (result, out) = run_reverse(&transport, &["51.5", "-0.12W", "-x"]);

        assert!(result.is_ok());
        assert!(out.contains("mlat=51.5&mlon=-0.12&"));
        assert_eq!(transport.urls().len(), 2);
    }

    #[test]
    fn test_reverse_provider_error() {
        let transport = FakeTransport::new().respond(200, r#"{"error":"Unable to geocode"}"#);
        let (result, out) = run_reverse(&transport, &["0", "-160"]);

        assert_eq!(result.unwrap_err().to_string(), "Unable to geocode");
        assert!(out.is_empty());
    }

    #[test]
    fn test_reverse_opens_editor() {
        let transport = FakeTransport::new()
            .respond(200, REVERSE_BODY)
            .respond(200, "ok");
        let (result, out) = run_reverse(&transport, &["51.5034", "-0.1276", "edit"]);

        assert!(result.is_ok());
        let urls = transport.urls();
        assert_eq!(urls.len(), 2);
        assert!(urls[1].starts_with("http://localhost:8111/load_and_zoom?top="));
        assert!(out.contains(&format!("edit in JOSM: <{}>", urls[1])));
    }

    #[test]
    fn test_reverse_editor_failure_fails_lookup() {
        let transport = FakeTransport::new()
            .respond(200, REVERSE_BODY)
            .respond(200, "fail");
        let (result, out) = run_reverse(&transport, &["51.5034", "-0.1276", "edit"]);

        assert!(matches!(result, Err(LookupError::Api(ApiError::Editor(_)))));
        assert!(out.starts_with("building/yes 10 Downing Street, London"));
    }

    #[test]
    fn test_reverse_editor_not_running() {
        let transport = FakeTransport::new()
            .respond(200, REVERSE_BODY)
            .fail("connection refused");
        let (result, _) = run_reverse(&transport, &["51.5034", "-0.1276", "1"]);

        assert!(matches!(
            result,
            Err(LookupError::Api(ApiError::Transport { .. }))
        ));
    }
}
