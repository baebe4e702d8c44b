//! The Drizzle product: questions, optional packages and template

use include_dir::{include_dir, Dir};
use scaffolder_core::prompt::PriorAnswers;
use scaffolder_core::resolver::ConfigurationError;
use scaffolder_core::text::{is_long_as, is_slug, to_repository_url, to_slug};
use scaffolder_core::{
    AnswerValue, CatalogError, DependencyCatalog, DerivedField, ProductConfig, PromptEntry,
    PromptOptions, PromptSpec, ResolvedConfig,
};
use std::path::Path;

static TEMPLATE: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/../../templates/drizzle");

const CATALOG: &str = include_str!("catalog.yaml");

/// Supported `engines.node` ranges; the first is the default
pub const NODE_VERSIONS: [&str; 2] = [">=4.0.0", ">=5.0.0"];

const DEFAULT_TITLE: &str = "Untitled Drizzle Project";
const DEFAULT_DESCRIPTION: &str = "A description of my project.";
const DEFAULT_AUTHOR: &str = "cloudfour";
const FALLBACK_SLUG: &str = "drizzle-project";

const TOO_SHORT: &str = "Please enter at least 2 characters";

/// Drizzle product configuration
#[derive(Clone)]
pub struct DrizzleConfig;

fn long_enough(value: &AnswerValue) -> bool {
    value.as_text().is_some_and(|text| is_long_as(2, text))
}

fn full_mode(prior: &PriorAnswers<'_>) -> Result<bool, ConfigurationError> {
    Ok(prior.text("mode")? == Some("full"))
}

/// A valid slug made from `input`, if there is one
fn slug_of(input: &str) -> Option<String> {
    let slug = to_slug(input);
    is_slug(&slug).then_some(slug)
}

/// Slug of the project directory, used wherever the title gives none
fn directory_slug(project_name: &str) -> String {
    slug_of(project_name).unwrap_or_else(|| FALLBACK_SLUG.to_string())
}

impl ProductConfig for DrizzleConfig {
    fn display_name(&self) -> &'static str {
        "Drizzle"
    }

    fn intro(&self) -> &'static str {
        "Welcome to your new Drizzle project."
    }

    fn embedded_template(&self) -> &'static Dir<'static> {
        &TEMPLATE
    }

    fn template_dir_env(&self) -> &'static str {
        "DRIZZLE_TEMPLATE_DIR"
    }

    fn prompt_spec(&self, options: &PromptOptions) -> Result<PromptSpec, ConfigurationError> {
        let mode = if options.full { "full" } else { "default" };
        let fallback_slug = directory_slug(&options.project_name);

        PromptSpec::new(vec![
            PromptEntry::select("mode", "Setup", ["default", "full"]).default(mode),
            PromptEntry::text("title", "Title")
                .default(DEFAULT_TITLE)
                .validate(TOO_SHORT, long_enough),
            PromptEntry::text("description", "Description")
                .default(DEFAULT_DESCRIPTION)
                .validate(TOO_SHORT, long_enough),
            PromptEntry::text("author", "Author")
                .default(DEFAULT_AUTHOR)
                .validate(TOO_SHORT, long_enough),
            PromptEntry::text("repository", "Repository for package.json")
                .default_with(move |prior| {
                    let missing = |key: &str| ConfigurationError::DefaultFailed {
                        key: prior.entry().to_string(),
                        reason: format!("'{}' has no value", key),
                    };
                    let author = prior.text("author")?.ok_or_else(|| missing("author"))?;
                    let title = prior.text("title")?.ok_or_else(|| missing("title"))?;
                    let slug = slug_of(title).unwrap_or_else(|| fallback_slug.clone());
                    Ok(to_repository_url(author, &slug).into())
                })
                .visible_when(full_mode),
            PromptEntry::select("nodeVersion", "Node version for package.json", NODE_VERSIONS)
                .default(NODE_VERSIONS[0])
                .visible_when(full_mode),
            PromptEntry::packages("dependencies", "Include optional packages?")
                .visible_when(full_mode),
            PromptEntry::confirm("polyfills", "Include polyfills.io <script>?")
                .visible_when(full_mode),
            PromptEntry::confirm("serviceWorker", "Include service-worker.js <script>?")
                .visible_when(full_mode),
        ])?
        .with_derived(vec![
            DerivedField::new("slug", |config| {
                config.text("title").and_then(slug_of).map(AnswerValue::from)
            }),
            DerivedField::new("repository", |config| {
                Some(to_repository_url(config.text("author")?, config.text("slug")?).into())
            }),
        ])
    }

    fn catalog(&self) -> Result<DependencyCatalog, CatalogError> {
        DependencyCatalog::from_yaml(CATALOG)
    }

    fn static_defaults(&self, project_name: &str) -> ResolvedConfig {
        ResolvedConfig::from_defaults(vec![
            ("slug", AnswerValue::from(directory_slug(project_name))),
            ("nodeVersion", AnswerValue::from(NODE_VERSIONS[0])),
            ("dependencies", AnswerValue::List(Vec::new())),
            ("polyfills", AnswerValue::Bool(false)),
            ("serviceWorker", AnswerValue::Bool(false)),
        ])
    }

    fn next_steps(&self, dir: &Path, config: &ResolvedConfig) -> Vec<String> {
        let mut steps = Vec::new();
        let current = std::env::current_dir().ok();

        // Step 1: cd to directory if not current
        if current.as_deref() != Some(dir) {
            steps.push(format!("cd {}", dir.display()));
        }

        // Step 2: Match the Node version
        steps.push("nvm use".to_string());

        // Step 3: Install the base toolchain (selected packages are already in)
        steps.push("npm install".to_string());

        // Step 4: Start dev server
        steps.push("npm start".to_string());

        if let Some(repository) = config.text("repository") {
            steps.push(format!("git init && git remote add origin {}", repository));
        }

        steps
    }

    fn upgrade_command(&self) -> &'static str {
        "cargo install drizzle-tools --force"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scaffolder_core::resolver::conflict_prompt_key;
    use scaffolder_core::{ConfigResolver, ResolveError, ScriptedPrompter, TemplateSource};

    fn resolve(
        options: PromptOptions,
        prompter: &mut ScriptedPrompter,
    ) -> Result<ResolvedConfig, ResolveError> {
        let config = DrizzleConfig;
        let spec = config.prompt_spec(&options).unwrap();
        let catalog = config.catalog().unwrap();
        ConfigResolver::new(&spec, &catalog)
            .with_defaults(config.static_defaults("my-site"))
            .resolve(prompter)
    }

    fn full() -> PromptOptions {
        PromptOptions {
            full: true,
            project_name: "my-site".to_string(),
        }
    }

    fn short() -> PromptOptions {
        PromptOptions {
            full: false,
            project_name: "my-site".to_string(),
        }
    }

    #[test]
    fn test_default_mode_asks_four_questions() {
        let mut prompter = ScriptedPrompter::new()
            .answer("mode", "default")
            .answer("title", "Test title")
            .answer("description", "Test description")
            .answer("author", "tester");

        let config = resolve(short(), &mut prompter).unwrap();

        assert_eq!(prompter.asked_keys(), vec!["mode", "title", "description", "author"]);
        assert_eq!(config.text("slug"), Some("test-title"));
        assert_eq!(
            config.text("repository"),
            Some("git@github.com:tester/test-title.git")
        );
        assert_eq!(config.text("nodeVersion"), Some(">=4.0.0"));
        assert_eq!(config.list("dependencies"), Some(&[][..]));
        assert_eq!(config.flag("serviceWorker"), Some(false));
    }

    #[test]
    fn test_full_flag_preselects_full_mode() {
        let mut prompter = ScriptedPrompter::new();
        let config = resolve(full(), &mut prompter).unwrap();

        assert_eq!(config.text("mode"), Some("full"));
        assert_eq!(
            prompter.asked_keys(),
            vec![
                "mode",
                "title",
                "description",
                "author",
                "repository",
                "nodeVersion",
                "dependencies",
                "polyfills",
                "serviceWorker",
            ]
        );
        assert_eq!(
            config.text("repository"),
            Some("git@github.com:cloudfour/untitled-drizzle-project.git")
        );
    }

    #[test]
    fn test_repository_default_follows_answers() {
        let mut prompter = ScriptedPrompter::new()
            .answer("title", "Pattern Library")
            .answer("author", "jane");
        resolve(full(), &mut prompter).unwrap();

        let repository = prompter
            .asked()
            .iter()
            .find(|d| d.key == "repository")
            .unwrap();
        assert_eq!(
            repository.default,
            Some(AnswerValue::from("git@github.com:jane/pattern-library.git"))
        );
    }

    #[test]
    fn test_prompted_repository_is_kept() {
        let mut prompter =
            ScriptedPrompter::new().answer("repository", "https://example.com/site.git");
        let config = resolve(full(), &mut prompter).unwrap();
        assert_eq!(config.text("repository"), Some("https://example.com/site.git"));
    }

    #[test]
    fn test_short_title_is_asked_again() {
        let mut prompter = ScriptedPrompter::new()
            .answer("title", "x")
            .answer("title", "Long enough");
        let config = resolve(short(), &mut prompter).unwrap();

        let titles: Vec<_> = prompter
            .asked()
            .iter()
            .filter(|d| d.key == "title")
            .collect();
        assert_eq!(titles.len(), 2);
        assert_eq!(titles[1].rejection.as_deref(), Some(TOO_SHORT));
        assert_eq!(config.text("title"), Some("Long enough"));
    }

    #[test]
    fn test_unsluggable_title_keeps_directory_slug() {
        let mut prompter = ScriptedPrompter::new().answer("title", "!!!");
        let config = resolve(short(), &mut prompter).unwrap();
        assert_eq!(config.text("slug"), Some("my-site"));
    }

    #[test]
    fn test_unsluggable_title_repository_uses_directory_slug() {
        let mut prompter = ScriptedPrompter::new().answer("title", "!!!");
        let config = resolve(full(), &mut prompter).unwrap();

        assert_eq!(config.text("slug"), Some("my-site"));
        assert_eq!(
            config.text("repository"),
            Some("git@github.com:cloudfour/my-site.git")
        );
    }

    #[test]
    fn test_redundant_packages_are_followed_up() {
        let mut prompter = ScriptedPrompter::new()
            .answer("dependencies", vec!["gsap", "ramda", "lodash", "postcss-mixins"])
            .answer(conflict_prompt_key("dependencies"), vec!["lodash"]);
        let config = resolve(full(), &mut prompter).unwrap();

        let follow_up = prompter.asked().last().unwrap();
        assert_eq!(follow_up.key, conflict_prompt_key("dependencies"));
        let offered: Vec<_> = follow_up.selectable().collect();
        assert_eq!(offered, vec!["ramda", "lodash"]);

        let kept: Vec<_> = config
            .list("dependencies")
            .unwrap()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(kept, vec!["gsap", "ramda", "postcss-mixins"]);
    }

    #[test]
    fn test_catalog_has_both_groups() {
        let catalog = DrizzleConfig.catalog().unwrap();
        let groups: Vec<_> = catalog
            .list_by_category()
            .into_iter()
            .map(|(label, packages)| (label, packages.len()))
            .collect();
        assert_eq!(groups, vec![("JavaScript", 6), ("PostCSS", 3)]);
    }

    #[test]
    fn test_static_slug_from_directory_name() {
        let config = DrizzleConfig;
        assert_eq!(
            config.static_defaults("My Site").text("slug"),
            Some("my-site")
        );
        assert_eq!(
            config.static_defaults("my-site").text("slug"),
            Some("my-site")
        );
        assert_eq!(
            config.static_defaults("2024").text("slug"),
            Some(FALLBACK_SLUG)
        );
    }

    #[test]
    fn test_embedded_template_renders_with_defaults() {
        let source = TemplateSource::Embedded(DrizzleConfig.embedded_template());
        let template = source.load().unwrap();

        let mut prompter = ScriptedPrompter::new().answer("serviceWorker", true);
        let config = resolve(full(), &mut prompter).unwrap();

        let rendered = scaffolder_core::render_template(&template, &config).unwrap();
        let paths: Vec<_> = rendered.iter().map(|f| f.path.as_str()).collect();
        assert!(paths.contains(&"package.json"));
        assert!(paths.contains(&"src/service-worker.js"));
        assert!(paths.contains(&".github/CONTRIBUTING.md"));
        assert!(!paths.contains(&"template.yaml"));

        let package = rendered.iter().find(|f| f.path == "package.json").unwrap();
        let package = String::from_utf8(package.content.clone()).unwrap();
        assert!(package.contains(r#""name": "untitled-drizzle-project""#));
        assert!(package.contains(r#""node": ">=4.0.0""#));
    }

    #[test]
    fn test_default_mode_omits_service_worker() {
        let template = TemplateSource::Embedded(DrizzleConfig.embedded_template())
            .load()
            .unwrap();
        let config = resolve(short(), &mut ScriptedPrompter::new()).unwrap();

        let rendered = scaffolder_core::render_template(&template, &config).unwrap();
        assert!(rendered.iter().all(|f| f.path != "src/service-worker.js"));
    }

    fn rendered_text(files: &[scaffolder_core::templates::RenderedFile], path: &str) -> String {
        let file = files.iter().find(|f| f.path == path).unwrap();
        String::from_utf8(file.content.clone()).unwrap()
    }

    #[test]
    fn test_quoted_answers_render_valid_files() {
        let template = TemplateSource::Embedded(DrizzleConfig.embedded_template())
            .load()
            .unwrap();
        let mut prompter = ScriptedPrompter::new()
            .answer("title", "Bob's Patterns")
            .answer("description", r#"A "quoted" library"#)
            .answer("author", "o'brien");
        let config = resolve(short(), &mut prompter).unwrap();

        let rendered = scaffolder_core::render_template(&template, &config).unwrap();

        let package: serde_json::Value =
            serde_json::from_str(&rendered_text(&rendered, "package.json")).unwrap();
        assert_eq!(package["description"], r#"A "quoted" library"#);
        assert_eq!(package["author"], "o'brien");
        assert_eq!(package["name"], "bobs-patterns");

        let project: serde_yaml::Value =
            serde_yaml::from_str(&rendered_text(&rendered, "src/data/project.yaml")).unwrap();
        assert_eq!(project["title"].as_str(), Some("Bob's Patterns"));

        let js = rendered_text(&rendered, "config.js");
        assert!(!js.contains("'Bob's"));

        let html = rendered_text(&rendered, "src/index.html");
        assert!(html.contains("content=\"A &quot;quoted&quot; library\""));
    }

    #[test]
    fn test_check_template_passes_for_embedded_template() {
        let source = TemplateSource::Embedded(DrizzleConfig.embedded_template());
        scaffolder_core::templates::check_template(&DrizzleConfig, &source).unwrap();
    }
}
