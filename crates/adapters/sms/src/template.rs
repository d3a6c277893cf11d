//! 短信模板渲染

use std::collections::HashMap;

use tera::{Context, Tera};

use crate::SmsError;

/// 模板表：模板 ID -> tera 正文，参数按位置放在 `args` 中，如 `{{ args.0 }}`
#[derive(Debug, Clone, Default)]
pub struct SmsTemplates {
    tera: Tera,
}

impl SmsTemplates {
    pub fn new(templates: HashMap<String, String>) -> Result<Self, SmsError> {
        templates
            .into_iter()
            .try_fold(Self::default(), |acc, (id, body)| acc.with_template(id, body))
    }

    pub fn with_template(
        mut self,
        id: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Self, SmsError> {
        let id = id.into();
        self.tera
            .add_raw_template(&id, &body.into())
            .map_err(|e| SmsError::Template(format!("{}: {}", id, e)))?;
        Ok(self)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tera.get_template_names().any(|name| name == id)
    }

    pub fn render(&self, id: &str, args: &[String]) -> Result<String, SmsError> {
        if !self.contains(id) {
            return Err(SmsError::UnknownTemplate(id.to_string()));
        }

        let mut context = Context::new();
        context.insert("args", args);

        self.tera
            .render(id, &context)
            .map_err(|e| SmsError::Template(format!("{}: {}", id, e)))
    }
}
