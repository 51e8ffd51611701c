//! Generator driver: validate, group, synthesize, write.

use crate::{
    config::{DuplicatePolicy, GeneratorConfig},
    diagnostic::{Diagnostic, DiagnosticKind},
    error::Error,
    model::{HostModel, ModelSet},
    render::{ARTIFACT_DIR, INDEX_FILE, Synthesizer},
    sink::ArtifactSink,
    site::DeclarationSite,
    validate::{FieldBinding, validate_site},
};
use std::path::PathBuf;

///
/// ArtifactRecord
/// one binder written during a pass
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ArtifactRecord {
    pub host: String,
    pub binder_name: String,
    pub file: String,
}

///
/// Report
///
/// Outcome of a pass. There is no aggregate failure: each diagnostic is
/// attributed to its own element and can be acted on independently.
///

#[derive(Clone, Debug, Default)]
pub struct Report {
    pub artifacts: Vec<ArtifactRecord>,
    pub index: Option<String>,
    pub diagnostics: Vec<Diagnostic>,

    /// Source files the pass depended on.
    pub sources: Vec<PathBuf>,
}

impl Report {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }

    #[must_use]
    pub fn binder_names(&self) -> Vec<&str> {
        self.artifacts
            .iter()
            .map(|record| record.binder_name.as_str())
            .collect()
    }
}

///
/// Generator
///

#[derive(Clone, Debug)]
pub struct Generator {
    config: GeneratorConfig,
    synthesizer: Synthesizer,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Result<Self, Error> {
        let synthesizer = Synthesizer::new(config.runtime_tokens()?);

        Ok(Self {
            config,
            synthesizer,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    #[must_use]
    pub const fn synthesizer(&self) -> &Synthesizer {
        &self.synthesizer
    }

    /// Run one generation pass over every declaration site of a crate.
    ///
    /// Models live only for the duration of the call, so repeated or
    /// concurrent passes never see each other's state.
    pub fn run_pass(&self, sites: &[DeclarationSite], sink: &mut dyn ArtifactSink) -> Report {
        tracing::debug!(sites = sites.len(), "generation pass started");

        let mut report = Report::default();

        // Phase 1: validate each site independently.
        let bindings = sites
            .iter()
            .filter_map(|site| match validate_site(site) {
                Ok(binding) => Some(binding),
                Err(diag) => {
                    tracing::warn!(%diag, "declaration site rejected");
                    report.diagnostics.push(diag);
                    None
                }
            })
            .collect::<Vec<_>>();

        // Phase 2: group by host.
        let models = self.group(bindings, &mut report);

        // Phase 3: synthesize and write, one host at a time.
        let mut written = Vec::with_capacity(models.len());
        for model in models.iter() {
            if self.write_model(model, sink, &mut report) {
                written.push(model);
            }
        }

        // Phase 4: the table of every binder that made it to disk.
        let index = self.synthesizer.render_index(&written);
        match sink.create(INDEX_FILE, &index) {
            Ok(()) => report.index = Some(INDEX_FILE.to_string()),
            Err(err) => {
                tracing::error!(%err, "binder table write failed");
                report.diagnostics.push(Diagnostic::error(
                    DiagnosticKind::ArtifactWriteFailure,
                    None,
                    format!("unable to write binder table: {err}"),
                ));
            }
        }

        tracing::debug!(
            hosts = models.len(),
            artifacts = report.artifacts.len(),
            diagnostics = report.diagnostics.len(),
            "generation pass finished"
        );

        report
    }

    fn group(&self, bindings: Vec<FieldBinding>, report: &mut Report) -> ModelSet {
        let mut models = ModelSet::new();

        for binding in bindings {
            let host = &binding.host;
            let model = models.entry(host);

            if let Some(existing) = model.bindings.get(binding.slot) {
                let message = format!(
                    "slot {} is declared twice on `{}` (fields `{}` and `{}`)",
                    binding.slot,
                    host.qualified_name(),
                    existing.name(),
                    binding.field.name(),
                );

                match self.config.duplicate_slots {
                    DuplicatePolicy::Warn => {
                        tracing::warn!(slot = binding.slot, host = %host.ident, "duplicate slot");
                        report.diagnostics.push(Diagnostic::warning(
                            DiagnosticKind::DuplicateSlotOnSameClass,
                            Some(binding.location.clone()),
                            format!("{message}; the later declaration wins"),
                        ));
                    }
                    DuplicatePolicy::Deny => {
                        tracing::warn!(slot = binding.slot, host = %host.ident, "duplicate slot rejected");
                        report.diagnostics.push(Diagnostic::error(
                            DiagnosticKind::DuplicateSlotOnSameClass,
                            Some(binding.location.clone()),
                            message,
                        ));
                        continue;
                    }
                }
            }

            model.add_binding(binding.slot, binding.field);
        }

        models
    }

    // write_model
    // a failure here is attributed to the host and never stops the pass
    fn write_model(
        &self,
        model: &HostModel,
        sink: &mut dyn ArtifactSink,
        report: &mut Report,
    ) -> bool {
        let text = self.synthesizer.render(model);
        let file = format!("{ARTIFACT_DIR}/{}", model.artifact_file());

        match sink.create(&file, &text) {
            Ok(()) => {
                tracing::debug!(binder = %model.binder_name(), %file, "artifact written");
                report.artifacts.push(ArtifactRecord {
                    host: model.qualified_name(),
                    binder_name: model.binder_name(),
                    file,
                });

                true
            }
            Err(err) => {
                tracing::error!(host = %model.qualified_name(), %err, "artifact write failed");
                report.diagnostics.push(Diagnostic::error(
                    DiagnosticKind::ArtifactWriteFailure,
                    Some(model.location.clone()),
                    format!(
                        "unable to write binder for type `{}`: {err}",
                        model.qualified_name()
                    ),
                ));

                false
            }
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        scan::Scanner,
        sink::{ArtifactError, MemorySink},
    };

    fn scan(source: &str) -> Vec<DeclarationSite> {
        Scanner::new("app")
            .scan_source(&[], "src/lib.rs", source)
            .sites
    }

    fn generator(config: GeneratorConfig) -> Generator {
        Generator::new(config).expect("valid config")
    }

    const THREE_HOSTS: &str = r"
        pub struct Alpha {
            #[bind(1)]
            pub a: Label,
            #[bind(2)]
            pub b: Label,
        }

        pub struct Beta {
            #[bind(1)]
            pub a: Label,
        }

        pub struct Gamma(#[bind(9)] pub Label);
    ";

    #[test]
    fn groups_fields_by_host() {
        let mut sink = MemorySink::new();
        let report = generator(GeneratorConfig::new("app")).run_pass(&scan(THREE_HOSTS), &mut sink);

        assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
        assert_eq!(
            report.binder_names(),
            vec!["app::Alpha$$Bind", "app::Beta$$Bind", "app::Gamma$$Bind"]
        );
        assert_eq!(
            sink.names(),
            vec![
                "viewbind.rs",
                "viewbind/app__Alpha__Bind.rs",
                "viewbind/app__Beta__Bind.rs",
                "viewbind/app__Gamma__Bind.rs",
            ]
        );

        let alpha = sink.get("viewbind/app__Alpha__Bind.rs").expect("alpha artifact");
        assert_eq!(alpha.matches("__internal :: fetch").count(), 2);
    }

    #[test]
    fn raw_identifier_hosts_generate_unprefixed_binders() {
        let mut sink = MemorySink::new();
        let sites = scan(
            r"
            pub mod r#type {
                pub struct r#Home {
                    #[bind(1)]
                    pub title: Label,
                }
            }
            ",
        );
        let report = generator(GeneratorConfig::new("app")).run_pass(&sites, &mut sink);

        assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
        assert_eq!(report.binder_names(), vec!["app::type::Home$$Bind"]);

        let artifact = sink
            .get("viewbind/app__type__Home__Bind.rs")
            .expect("raw host artifact");
        assert!(artifact.contains("crate :: r#type :: Home"), "{artifact}");
    }

    #[test]
    fn cfg_gated_hosts_are_gated_in_the_index() {
        let mut sink = MemorySink::new();
        let sites = scan(
            r#"
            #[cfg(feature = "screens")]
            pub mod screens {
                pub struct Home {
                    #[bind(1)]
                    pub title: Label,
                }
            }
            "#,
        );
        let report = generator(GeneratorConfig::new("app")).run_pass(&sites, &mut sink);
        assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);

        let cfg = quote::quote!(#[cfg(feature = "screens")]).to_string();
        let index = sink.get("viewbind.rs").expect("index");
        assert!(index.contains(&format!("{cfg} include !")), "{index}");
        assert!(index.contains(&format!("{cfg} & app__screens__Home__Bind")), "{index}");
    }

    #[test]
    fn repeated_passes_are_identical() {
        let generator = generator(GeneratorConfig::new("app"));
        let sites = scan(THREE_HOSTS);

        let mut first = MemorySink::new();
        let mut second = MemorySink::new();
        generator.run_pass(&sites, &mut first);
        generator.run_pass(&sites, &mut second);

        assert_eq!(first.artifacts, second.artifacts);
    }

    #[test]
    fn invalid_site_does_not_stop_valid_hosts() {
        let source = format!(
            "{THREE_HOSTS}
            pub struct Broken {{
                #[bind(5)]
                hidden: Label,
            }}
            "
        );

        let mut sink = MemorySink::new();
        let report = generator(GeneratorConfig::new("app")).run_pass(&scan(&source), &mut sink);

        assert_eq!(report.errors().count(), 1);
        assert_eq!(
            report.diagnostics[0].kind,
            DiagnosticKind::InvalidDeclarationSite
        );
        assert_eq!(report.artifacts.len(), 3);
        assert!(sink.get("viewbind/app__Broken__Bind.rs").is_none());
    }

    #[test]
    fn duplicate_slot_warns_and_last_write_wins() {
        let sites = scan(
            r"
            pub struct Home {
                #[bind(1)]
                pub first: Label,
                #[bind(1)]
                pub second: Label,
            }
            ",
        );

        let mut sink = MemorySink::new();
        let report = generator(GeneratorConfig::new("app")).run_pass(&sites, &mut sink);

        assert!(!report.has_errors());
        let warning = report.warnings().next().expect("duplicate warning");
        assert_eq!(warning.kind, DiagnosticKind::DuplicateSlotOnSameClass);
        assert!(warning.message.contains("fields `first` and `second`"));

        let text = sink.get("viewbind/app__Home__Bind.rs").expect("home artifact");
        assert!(text.contains("host . second ="));
        assert!(!text.contains("host . first ="));
    }

    #[test]
    fn duplicate_slot_deny_keeps_first_declaration() {
        let sites = scan(
            r"
            pub struct Home {
                #[bind(1)]
                pub first: Label,
                #[bind(1)]
                pub second: Label,
            }
            ",
        );

        let config = GeneratorConfig::new("app").with_duplicate_slots(DuplicatePolicy::Deny);
        let mut sink = MemorySink::new();
        let report = generator(config).run_pass(&sites, &mut sink);

        assert_eq!(report.errors().count(), 1);
        let text = sink.get("viewbind/app__Home__Bind.rs").expect("home artifact");
        assert!(text.contains("host . first ="));
        assert!(!text.contains("host . second ="));
    }

    ///
    /// FailingSink
    /// refuses one artifact name, accepts the rest
    ///

    struct FailingSink {
        inner: MemorySink,
        refuse: &'static str,
    }

    impl ArtifactSink for FailingSink {
        fn create(&mut self, name: &str, text: &str) -> Result<(), ArtifactError> {
            if name == self.refuse {
                return Err(ArtifactError::Io {
                    name: name.to_string(),
                    source: std::io::Error::other("disk full"),
                });
            }

            self.inner.create(name, text)
        }
    }

    #[test]
    fn write_failure_is_isolated_to_its_host() {
        let mut sink = FailingSink {
            inner: MemorySink::new(),
            refuse: "viewbind/app__Beta__Bind.rs",
        };

        let report = generator(GeneratorConfig::new("app")).run_pass(&scan(THREE_HOSTS), &mut sink);

        let errors: Vec<_> = report.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, DiagnosticKind::ArtifactWriteFailure);
        assert!(errors[0].message.contains("app::Beta"));
        assert!(errors[0].message.contains("disk full"));

        assert_eq!(
            report.binder_names(),
            vec!["app::Alpha$$Bind", "app::Gamma$$Bind"]
        );

        let index = sink.inner.get("viewbind.rs").expect("index written");
        assert!(!index.contains("app__Beta__Bind"));
    }

    #[test]
    fn no_sites_still_writes_an_empty_table() {
        let mut sink = MemorySink::new();
        let report = generator(GeneratorConfig::new("app")).run_pass(&[], &mut sink);

        assert!(report.artifacts.is_empty());
        assert_eq!(report.index.as_deref(), Some("viewbind.rs"));
        assert!(sink.get("viewbind.rs").is_some_and(|text| text.contains("VIEWBIND_BINDERS")));
    }
}
