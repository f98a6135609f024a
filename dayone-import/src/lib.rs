//! Day One CSV export → Org datetree importer.
//!
//! Records are read from the export, their bodies and metadata are rewritten for Org,
//! and each entry is placed under its year/month/day heading. Re-importing the same
//! export is safe: entries are matched by UUID and either skipped or replaced.

pub mod error {
    use org::core::DomainError;
    use std::path::PathBuf;

    #[derive(Debug, thiserror::Error)]
    pub enum ImportError {
        #[error("reading {path:?}")]
        Io {
            path: PathBuf,
            #[source]
            source: std::io::Error,
        },
        #[error("malformed CSV")]
        Csv(#[from] csv::Error),
        #[error("entry {uuid} has an unusable date {value:?}")]
        InvalidDate { uuid: String, value: String },
        #[error("failed to load the target document")]
        Document(#[source] anyhow::Error),
        #[error("invalid config file {path:?}")]
        Config {
            path: PathBuf,
            #[source]
            source: toml::de::Error,
        },
        #[error("unrecognized conflict policy {0:?} (expected `skip` or `replace`)")]
        Configuration(String),
        #[error("anchor {} not found in the target document", .0.join(" / "))]
        AnchorNotFound(Vec<String>),
        #[error(transparent)]
        Outline(DomainError),
    }

    impl From<DomainError> for ImportError {
        fn from(e: DomainError) -> Self {
            match e {
                DomainError::AnchorNotFound(olp) => ImportError::AnchorNotFound(olp),
                other => ImportError::Outline(other),
            }
        }
    }
}

pub mod record {
    //! CSV export → ordered records.

    use crate::error::ImportError;
    use csv::ReaderBuilder;
    use indexmap::IndexMap;
    use std::{fs::File, io::Read, path::Path};

    /// One CSV row keyed by header name, in header order.
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct Record {
        fields: IndexMap<String, String>,
    }

    impl Record {
        pub fn get(&self, field: &str) -> Option<&str> {
            self.fields.get(field).map(String::as_str)
        }

        /// The value of `field` unless it is absent or whitespace only.
        pub fn non_blank(&self, field: &str) -> Option<&str> {
            self.get(field).filter(|v| !v.trim().is_empty())
        }

        pub fn uuid(&self) -> &str {
            self.get("uuid").unwrap_or_default()
        }

        pub fn field_names(&self) -> impl Iterator<Item = &str> {
            self.fields.keys().map(String::as_str)
        }

        pub fn len(&self) -> usize {
            self.fields.len()
        }

        pub fn is_empty(&self) -> bool {
            self.fields.is_empty()
        }
    }

    impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
        fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
            Self {
                fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            }
        }
    }

    pub fn read_records(path: &Path) -> Result<Vec<Record>, ImportError> {
        let file = File::open(path).map_err(|source| ImportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        records_from_reader(file)
    }

    pub fn parse_records(input: &str) -> Result<Vec<Record>, ImportError> {
        records_from_reader(input.as_bytes())
    }

    /// Rows are zipped against the header: short rows leave keys absent, extra cells are
    /// ignored. Rows without a UUID (export padding, blank trailing lines) are dropped.
    fn records_from_reader<R: Read>(reader: R) -> Result<Vec<Record>, ImportError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut out = Vec::new();
        for row in rdr.records() {
            let row = row?;
            let record: Record = headers.iter().cloned().zip(row.iter()).collect();
            if record.non_blank("uuid").is_some() {
                out.push(record);
            }
        }
        Ok(out)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn rows_zip_against_header() {
            let input = "uuid,date,text\nA,2024-01-01T00:00:00Z,\"multi\nline, quoted\"\nB,2024-01-02T00:00:00Z\n";
            let records = parse_records(input).expect("parse");
            assert_eq!(records.len(), 2);
            assert_eq!(records[0].get("text"), Some("multi\nline, quoted"));
            assert_eq!(
                records[0].field_names().collect::<Vec<_>>(),
                vec!["uuid", "date", "text"]
            );
            assert_eq!(records[1].get("text"), None);
            assert_eq!(records[1].len(), 2);
        }

        #[test]
        fn rows_without_uuid_are_dropped() {
            let input = "uuid,date,text\nA,2024-01-01,hi\n,,\n   ,2024-01-02,ghost\n";
            let records = parse_records(input).expect("parse");
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].uuid(), "A");
        }

        #[test]
        fn extra_cells_are_ignored_and_bom_stripped() {
            let input = "\u{feff}uuid,text\nA,hello,surplus\n";
            let records = parse_records(input).expect("parse");
            assert_eq!(records[0].uuid(), "A");
            assert_eq!(records[0].len(), 2);
        }

        #[test]
        fn unreadable_file_is_an_io_error() {
            let err = read_records(Path::new("/definitely/not/here.csv")).unwrap_err();
            assert!(matches!(err, ImportError::Io { .. }));
        }
    }
}

pub mod transform {
    //! Day One body markup → Org markup.

    use once_cell::sync::Lazy;
    use regex::Regex;

    static MARKDOWN_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(.*?)\]\((.*?)\)").unwrap());

    /// Bullets become list items, `---` rules become Org rules, and `[label](target)`
    /// links become `[[target][label]]`. Everything else passes through untouched.
    pub fn transform_text(body: &str) -> String {
        let lines: Vec<String> = body.split('\n').map(rewrite_line).collect();
        MARKDOWN_LINK
            .replace_all(&lines.join("\n"), "[[${2}][${1}]]")
            .into_owned()
    }

    fn rewrite_line(line: &str) -> String {
        if let Some(rest) = line.strip_prefix('•') {
            format!("  -{rest}")
        } else if line == "---" {
            "-----".to_string()
        } else {
            line.to_string()
        }
    }

}

pub mod properties {
    //! Record → ordered property pairs: prefixed static columns, then named generators.

    use crate::record::Record;
    use std::fmt;

    pub const DEFAULT_PREFIX: &str = "DAYONE_";

    pub const DEFAULT_COLUMNS: &[&str] = &[
        "uuid",
        "date",
        "modifiedDate",
        "timeZoneIdentifier",
        "latitude",
        "longitude",
        "placeName",
        "localityName",
        "administrativeArea",
        "country",
    ];

    pub const ADDRESS_FIELDS: [&str; 4] = ["placeName", "localityName", "administrativeArea", "country"];

    /// `None` suppresses the property; `Some("")` is emitted as an empty value.
    pub type GeneratorFn = Box<dyn Fn(&Record) -> Option<String>>;

    struct Generator {
        name: String,
        func: GeneratorFn,
    }

    pub struct PropertyExtractor {
        prefix: String,
        columns: Vec<String>,
        generators: Vec<Generator>,
    }

    impl Default for PropertyExtractor {
        fn default() -> Self {
            Self::new(DEFAULT_PREFIX, DEFAULT_COLUMNS.iter().copied()).with_default_generators()
        }
    }

    impl fmt::Debug for PropertyExtractor {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("PropertyExtractor")
                .field("prefix", &self.prefix)
                .field("columns", &self.columns)
                .field(
                    "generators",
                    &self.generators.iter().map(|g| g.name.as_str()).collect::<Vec<_>>(),
                )
                .finish()
        }
    }

    impl PropertyExtractor {
        /// Extractor with the given static columns and no generators.
        ///
        /// `uuid` is always extracted, first when the list leaves it out, since re-imports
        /// find earlier entries through it.
        pub fn new<I, S>(prefix: impl Into<String>, columns: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            let mut columns: Vec<String> = columns.into_iter().map(Into::into).collect();
            if !columns.iter().any(|c| c == "uuid") {
                columns.insert(0, "uuid".to_string());
            }
            Self {
                prefix: prefix.into(),
                columns,
                generators: vec![],
            }
        }

        /// Adds `SOURCE` and `ADDRESS`.
        pub fn with_default_generators(self) -> Self {
            self.with_generator("SOURCE", source).with_generator("ADDRESS", address)
        }

        pub fn with_generator(
            mut self,
            name: impl Into<String>,
            func: impl Fn(&Record) -> Option<String> + 'static,
        ) -> Self {
            self.register(name, func);
            self
        }

        pub fn with_constant(self, name: impl Into<String>, value: impl Into<String>) -> Self {
            let value = value.into();
            self.with_generator(name, move |_| Some(value.clone()))
        }

        pub fn register(
            &mut self,
            name: impl Into<String>,
            func: impl Fn(&Record) -> Option<String> + 'static,
        ) {
            self.generators.push(Generator {
                name: name.into(),
                func: Box::new(func),
            });
        }

        /// Property holding the entry UUID, used to detect earlier imports.
        pub fn uuid_property(&self) -> String {
            column_property(&self.prefix, "uuid")
        }

        pub fn extract(&self, record: &Record) -> Vec<(String, String)> {
            let mut out = Vec::new();
            for column in &self.columns {
                if let Some(value) = record.non_blank(column) {
                    out.push((column_property(&self.prefix, column), value.to_string()));
                }
            }
            for generator in &self.generators {
                if let Some(value) = (generator.func)(record) {
                    out.push((generator.name.clone(), value));
                }
            }
            out
        }
    }

    fn column_property(prefix: &str, column: &str) -> String {
        format!("{prefix}{}", column.to_uppercase())
    }

    pub fn source(_: &Record) -> Option<String> {
        Some("Day One".to_string())
    }

    /// Non-blank location parts joined with ", "; `None` when the entry has no location.
    pub fn address(record: &Record) -> Option<String> {
        let parts: Vec<&str> = ADDRESS_FIELDS
            .iter()
            .filter_map(|f| record.non_blank(f))
            .collect();
        (!parts.is_empty()).then(|| parts.join(", "))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn located() -> Record {
            [
                ("uuid", "ABC"),
                ("date", "2024-03-15T08:00:00Z"),
                ("modifiedDate", ""),
                ("placeName", "A"),
                ("localityName", "B"),
                ("administrativeArea", "C"),
                ("country", "D"),
                ("text", "body"),
            ]
            .into_iter()
            .collect()
        }

        #[test]
        fn static_columns_then_generators() {
            let props = PropertyExtractor::default().extract(&located());
            let names: Vec<&str> = props.iter().map(|(k, _)| k.as_str()).collect();
            assert_eq!(
                names,
                vec![
                    "DAYONE_UUID",
                    "DAYONE_DATE",
                    "DAYONE_PLACENAME",
                    "DAYONE_LOCALITYNAME",
                    "DAYONE_ADMINISTRATIVEAREA",
                    "DAYONE_COUNTRY",
                    "SOURCE",
                    "ADDRESS",
                ]
            );
            assert!(props.contains(&("SOURCE".to_string(), "Day One".to_string())));
            assert!(props.contains(&("ADDRESS".to_string(), "A, B, C, D".to_string())));
        }

        #[test]
        fn generators_may_suppress_or_emit_empty() {
            let record: Record = [("uuid", "X")].into_iter().collect();
            let props = PropertyExtractor::new("P_", ["uuid"])
                .with_generator("NOTHING", |_| None)
                .with_generator("EMPTY", |_| Some(String::new()))
                .with_constant("origin", "export")
                .extract(&record);
            assert_eq!(
                props,
                vec![
                    ("P_UUID".to_string(), "X".to_string()),
                    ("EMPTY".to_string(), String::new()),
                    ("origin".to_string(), "export".to_string()),
                ]
            );
        }

        #[test]
        fn uuid_is_extracted_even_when_not_listed() {
            let record: Record = [("uuid", "X"), ("date", "2024-01-01")].into_iter().collect();
            let extractor = PropertyExtractor::new(DEFAULT_PREFIX, ["date"]);
            assert_eq!(
                extractor.extract(&record),
                vec![
                    ("DAYONE_UUID".to_string(), "X".to_string()),
                    ("DAYONE_DATE".to_string(), "2024-01-01".to_string()),
                ]
            );
        }

        #[test]
        fn address_skips_missing_parts() {
            let record: Record = [("placeName", "Home"), ("country", "NZ")].into_iter().collect();
            assert_eq!(address(&record).as_deref(), Some("Home, NZ"));
            assert_eq!(address(&Record::default()), None);
        }
    }
}

pub mod config {
    //! Import options from an optional TOML file; CLI flags are layered on top by the binary.

    use crate::error::ImportError;
    use crate::import::ConflictPolicy;
    use crate::properties::{DEFAULT_COLUMNS, DEFAULT_PREFIX, PropertyExtractor};
    use indexmap::IndexMap;
    use serde::Deserialize;
    use std::{
        fs,
        path::{Path, PathBuf},
    };

    pub const DEFAULT_CSV: &str = "Journal.csv";

    #[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
    #[serde(default, deny_unknown_fields)]
    pub struct ImportConfig {
        /// Day One CSV export.
        pub csv: Option<PathBuf>,
        /// Directory holding `<uuid>.jpg` photos.
        pub photos: Option<PathBuf>,
        /// Target Org file; created when missing, updated in place otherwise.
        pub output: Option<PathBuf>,
        /// `skip` (default) or `replace`.
        pub on_conflict: Option<String>,
        /// Outline path to nest the datetree under.
        pub anchor: Vec<String>,
        pub property_prefix: Option<String>,
        pub columns: Option<Vec<String>>,
        /// Constant properties added to every entry after the built-in generators.
        pub properties: IndexMap<String, String>,
    }

    impl ImportConfig {
        pub fn load(path: &Path) -> Result<Self, ImportError> {
            let text = fs::read_to_string(path).map_err(|source| ImportError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            toml::from_str(&text).map_err(|source| ImportError::Config {
                path: path.to_path_buf(),
                source,
            })
        }

        pub fn csv_path(&self) -> PathBuf {
            self.csv
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV))
        }

        pub fn conflict_policy(&self) -> ConflictPolicy {
            self.on_conflict
                .as_deref()
                .map(ConflictPolicy::from)
                .unwrap_or_default()
        }

        pub fn anchor(&self) -> Option<Vec<String>> {
            (!self.anchor.is_empty()).then(|| self.anchor.clone())
        }

        pub fn extractor(&self) -> PropertyExtractor {
            let prefix = self.property_prefix.as_deref().unwrap_or(DEFAULT_PREFIX);
            let mut extractor = match &self.columns {
                Some(columns) => PropertyExtractor::new(prefix, columns.iter().cloned()),
                None => PropertyExtractor::new(prefix, DEFAULT_COLUMNS.iter().copied()),
            }
            .with_default_generators();
            for (name, value) in &self.properties {
                extractor = extractor.with_constant(name.clone(), value.clone());
            }
            extractor
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::record::Record;

        #[test]
        fn toml_fields_map_onto_options() {
            let config: ImportConfig = toml::from_str(
                r#"
csv = "export/Journal.csv"
on_conflict = "replace"
anchor = ["Life", "Journal"]
property_prefix = "DO_"
columns = ["uuid"]

[properties]
IMPORTED_BY = "dayone-to-org"
"#,
            )
            .expect("config");
            assert_eq!(config.csv_path(), PathBuf::from("export/Journal.csv"));
            assert_eq!(config.conflict_policy(), ConflictPolicy::Replace);
            assert_eq!(config.anchor().map(|a| a.len()), Some(2));

            let record: Record = [("uuid", "U1")].into_iter().collect();
            let props = config.extractor().extract(&record);
            assert_eq!(props[0], ("DO_UUID".to_string(), "U1".to_string()));
            assert_eq!(
                props.last(),
                Some(&("IMPORTED_BY".to_string(), "dayone-to-org".to_string()))
            );
        }

        #[test]
        fn defaults_when_empty() {
            let config = ImportConfig::default();
            assert_eq!(config.csv_path(), PathBuf::from(DEFAULT_CSV));
            assert_eq!(config.conflict_policy(), ConflictPolicy::Skip);
            assert_eq!(config.anchor(), None);
            assert_eq!(config.extractor().uuid_property(), "DAYONE_UUID");
        }

        #[test]
        fn unknown_keys_are_rejected() {
            assert!(toml::from_str::<ImportConfig>("colour = \"red\"").is_err());
        }
    }
}

pub mod import {
    //! Per-entry state machine: conflict check, datetree placement, body and properties.

    use crate::config::ImportConfig;
    use crate::error::ImportError;
    use crate::properties::PropertyExtractor;
    use crate::record::{self, Record};
    use crate::transform::transform_text;
    use org::core::{DomainError, OrgFile};
    use org::datetree::{find_or_create_entry, parse_entry_date, reset_entry};
    use org::parser::NomOrgParser;
    use org::storage;
    use std::{
        fmt,
        path::{Path, PathBuf},
    };
    use tracing::{debug, info};

    /// What to do when an entry's UUID is already present in the target document.
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub enum ConflictPolicy {
        #[default]
        Skip,
        Replace,
        /// Unrecognized value; only rejected once a conflict actually occurs.
        Unsupported(String),
    }

    impl From<&str> for ConflictPolicy {
        fn from(value: &str) -> Self {
            match value.trim() {
                "skip" => ConflictPolicy::Skip,
                "replace" => ConflictPolicy::Replace,
                other => ConflictPolicy::Unsupported(other.to_string()),
            }
        }
    }

    impl fmt::Display for ConflictPolicy {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                ConflictPolicy::Skip => f.write_str("skip"),
                ConflictPolicy::Replace => f.write_str("replace"),
                ConflictPolicy::Unsupported(v) => f.write_str(v),
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum EntryOutcome {
        Imported,
        Replaced,
        Skipped,
    }

    /// State threaded through one import run.
    #[derive(Debug, Clone, Default)]
    pub struct ImportContext {
        /// The target document was created for this run; no earlier entries can exist.
        pub is_new: bool,
        pub on_conflict: ConflictPolicy,
        pub anchor: Option<Vec<String>>,
        pub photo_dir: Option<PathBuf>,
        pub imported: usize,
        pub skipped: usize,
        pub replaced: usize,
    }

    impl ImportContext {
        pub fn new(is_new: bool, on_conflict: ConflictPolicy) -> Self {
            Self {
                is_new,
                on_conflict,
                ..Self::default()
            }
        }

        pub fn report(&self, source: &Path) -> ImportReport {
            ImportReport {
                source: source.to_path_buf(),
                imported: self.imported,
                skipped: self.skipped,
                replaced: self.replaced,
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ImportReport {
        pub source: PathBuf,
        /// Entries written, including replacements.
        pub imported: usize,
        pub skipped: usize,
        pub replaced: usize,
    }

    impl fmt::Display for ImportReport {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(
                f,
                "Imported {} entries from {}",
                self.imported,
                self.source.display()
            )?;
            if self.skipped > 0 {
                write!(f, " ({} already present, skipped)", self.skipped)?;
            }
            if self.replaced > 0 {
                write!(f, " ({} replaced)", self.replaced)?;
            }
            Ok(())
        }
    }

    /// Import every record in order. A fatal error stops the run and leaves `file` with
    /// whatever was written before it.
    pub fn import_records(
        file: &mut OrgFile,
        records: &[Record],
        ctx: &mut ImportContext,
        extractor: &PropertyExtractor,
    ) -> Result<(), ImportError> {
        if let Some(anchor) = ctx.anchor.as_deref().filter(|a| !a.is_empty()) {
            if !ctx.is_new && file.find_olp(anchor).is_none() {
                return Err(ImportError::AnchorNotFound(anchor.to_vec()));
            }
        }
        for record in records {
            import_entry(file, record, ctx, extractor)?;
        }
        Ok(())
    }

    pub fn import_entry(
        file: &mut OrgFile,
        record: &Record,
        ctx: &mut ImportContext,
        extractor: &PropertyExtractor,
    ) -> Result<EntryOutcome, ImportError> {
        let uuid = record.uuid();
        let raw_date = record.get("date").unwrap_or_default();
        let date = parse_entry_date(raw_date).map_err(|_| ImportError::InvalidDate {
            uuid: uuid.to_string(),
            value: raw_date.to_string(),
        })?;

        let mut outcome = EntryOutcome::Imported;
        let mut slot = None;
        if !ctx.is_new {
            if let Some(existing) = file.find_by_property(&extractor.uuid_property(), uuid) {
                match &ctx.on_conflict {
                    ConflictPolicy::Skip => {
                        info!(uuid, "entry already imported, skipping");
                        ctx.skipped += 1;
                        return Ok(EntryOutcome::Skipped);
                    }
                    ConflictPolicy::Replace => {
                        // Same-day replacements keep their position among siblings.
                        slot = reset_entry(file, &existing, date)?;
                        info!(uuid, "replacing previously imported entry");
                        ctx.replaced += 1;
                        outcome = EntryOutcome::Replaced;
                    }
                    ConflictPolicy::Unsupported(policy) => {
                        return Err(ImportError::Configuration(policy.clone()));
                    }
                }
            }
        }

        let path = match slot {
            Some(path) => path,
            None => find_or_create_entry(file, date, ctx.anchor.as_deref(), ctx.is_new, uuid)?,
        };
        let heading = file
            .heading_mut(&path)
            .ok_or_else(|| DomainError::NoSuchHeading(path.clone()))?;

        if let Some(link) = photo_link(ctx.photo_dir.as_deref(), uuid) {
            heading.section.lines.push(link);
        }
        heading
            .section
            .push_text(&transform_text(record.get("text").unwrap_or_default()));
        for (name, value) in extractor.extract(record) {
            heading.properties.set(name, value);
        }

        ctx.imported += 1;
        debug!(uuid, %date, heading = %heading.title, "entry written");
        Ok(outcome)
    }

    /// `[[file:/abs/<uuid>.jpg]]` when the photo exists.
    fn photo_link(dir: Option<&Path>, uuid: &str) -> Option<String> {
        let candidate = dir?.join(format!("{uuid}.jpg"));
        if !candidate.is_file() {
            return None;
        }
        let abs = std::path::absolute(&candidate).unwrap_or(candidate);
        Some(format!("[[file:{}]]", abs.display()))
    }

    /// Run the import described by `config`: read the export, load or create the target,
    /// and place every entry. Returns the updated document; writing it is up to the caller.
    pub fn run(config: &ImportConfig) -> Result<(OrgFile, ImportReport), ImportError> {
        let source = config.csv_path();
        let records = record::read_records(&source)?;

        let (mut file, is_new) = match &config.output {
            Some(path) => {
                storage::load_or_create(&NomOrgParser, path).map_err(ImportError::Document)?
            }
            None => (OrgFile::new(None), true),
        };

        let mut ctx = ImportContext::new(is_new, config.conflict_policy());
        ctx.anchor = config.anchor();
        ctx.photo_dir = config.photos.clone();
        let extractor = config.extractor();

        info!(
            source = %source.display(),
            entries = records.len(),
            is_new,
            policy = %ctx.on_conflict,
            "starting import"
        );
        import_records(&mut file, &records, &mut ctx, &extractor)?;

        let report = ctx.report(&source);
        info!(
            imported = report.imported,
            skipped = report.skipped,
            replaced = report.replaced,
            "import finished"
        );
        Ok((file, report))
    }

}

pub mod logging {
    use tracing_subscriber::EnvFilter;

    /// Install a stderr subscriber. `RUST_LOG` wins over the `verbose` default.
    pub fn init(verbose: bool) {
        let default = if verbose { "debug" } else { "info" };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .try_init();
    }
}

pub use error::ImportError;
pub use import::{ConflictPolicy, ImportContext, ImportReport, import_entry, import_records, run};
