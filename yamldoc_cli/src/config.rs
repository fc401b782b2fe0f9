use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;
use yamldoc_core::Annotated;

/// The configuration file of a blog post generator: post templates plus the
/// AI provider used to draft content and pictures.
#[derive(Annotated, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct CliConfig {
	#[yamldoc(tag = r#"comment:"Define the template of posts.""#)]
	pub templates: Vec<TemplateConfig>,
	#[yamldoc(tag = r#"comment:"AI configuration for content generation.""#)]
	#[serde(rename = "AI")]
	pub ai: AiConfig,
}

#[derive(Annotated, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct TemplateConfig {
	#[yamldoc(
		tag = r#"comment:"Template name, pass it as `--template-name` to generate a new post from this template.""#
	)]
	pub name: String,
	#[yamldoc(tag = r#"comment:"Categories of posts""#)]
	pub categories: Vec<String>,
	#[yamldoc(tag = r#"comment:"Tags of posts""#)]
	pub tags: Vec<String>,
	#[yamldoc(
		tag = r#"comment:"The template of posts. A minimal template is:\n+++\ntitle = \"{{ title }}\"\n+++""#
	)]
	pub template: String,
	#[yamldoc(tag = r#"comment:"Generate post path""#)]
	pub dir: String,
	#[yamldoc(
		tag = r#"comment:"If set, each post is created in its own directory as index.md" default:"false""#
	)]
	pub need_dir: bool,
	#[yamldoc(tag = r#"comment:"Pic summary prompt from target file.""#)]
	pub pic_summary_prompt: String,
	#[yamldoc(tag = r#"comment:"Pic create prompt from target file.""#)]
	pub pic_create_prompt: String,
}

#[derive(Annotated, Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct AiConfig {
	#[yamldoc(tag = r#"comment:"AI provider, e.g. 'volc' for VolcEngine." default:"volc""#)]
	pub provider: String,
	#[yamldoc(tag = r#"comment:"API key for the AI provider.""#)]
	#[serde(rename = "APIKey")]
	pub api_key: String,
	#[yamldoc(tag = r#"comment:"Model ID for text generation.""#)]
	pub think_model: String,
	#[yamldoc(tag = r#"comment:"Model ID for image generation.""#)]
	pub pic_model: String,
	#[yamldoc(tag = r#"comment:"Custom prompts for different scenarios.""#)]
	pub custom_prompt: HashMap<String, String>,
}

impl Default for AiConfig {
	fn default() -> Self {
		Self {
			provider: "volc".into(),
			api_key: String::new(),
			think_model: String::new(),
			pic_model: String::new(),
			custom_prompt: HashMap::new(),
		}
	}
}

/// The configuration printed by `yamldoc demo`.
pub fn demo_config() -> CliConfig {
	CliConfig {
		templates: vec![TemplateConfig {
			name: "test-template".into(),
			categories: vec!["tech".into()],
			template: "+++".into(),
			..TemplateConfig::default()
		}],
		..CliConfig::default()
	}
}
