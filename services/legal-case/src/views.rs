//! 页面模板
//!
//! 模板默认内置于二进制中，可通过配置目录整体覆盖。
//! `.html` 模板由 tera 自动转义，存储的原始输入在渲染时处理。

use docket_config::ViewConfig;
use docket_errors::{AppError, AppResult};
use serde::Serialize;
use tera::{Context, Tera};
use tracing::debug;

use crate::domain::{Case, CaseId, CaseOverview};

const INDEX: &str = "index.html";
const CASE_DETAIL: &str = "case_detail.html";
const ADD_CASE: &str = "add_case.html";
const ADD_PAYMENT: &str = "add_payment.html";

/// 渲染所需的页面模板，目录覆盖时必须全部提供
const PAGES: [&str; 4] = [INDEX, CASE_DETAIL, ADD_CASE, ADD_PAYMENT];

const EMBEDDED: [(&str, &str); 5] = [
    ("base.html", include_str!("../templates/base.html")),
    (INDEX, include_str!("../templates/index.html")),
    (CASE_DETAIL, include_str!("../templates/case_detail.html")),
    (ADD_CASE, include_str!("../templates/add_case.html")),
    (ADD_PAYMENT, include_str!("../templates/add_payment.html")),
];

/// 页面渲染器
pub struct Views {
    tera: Tera,
}

impl Views {
    /// 使用内置模板
    pub fn embedded() -> AppResult<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(EMBEDDED)
            .map_err(|e| AppError::internal(format!("Failed to load embedded templates: {}", e)))?;

        Ok(Self { tera })
    }

    /// 从目录加载模板
    pub fn from_dir(template_dir: &str) -> AppResult<Self> {
        let pattern = format!("{}/**/*.html", template_dir);
        let tera = Tera::new(&pattern)
            .map_err(|e| AppError::internal(format!("Failed to load templates: {}", e)))?;

        let missing: Vec<&str> = PAGES
            .into_iter()
            .filter(|page| !tera.get_template_names().any(|name| name == *page))
            .collect();
        if !missing.is_empty() {
            return Err(AppError::internal(format!(
                "Template directory {} is missing: {}",
                template_dir,
                missing.join(", ")
            )));
        }

        debug!(template_dir = %template_dir, "Templates loaded");

        Ok(Self { tera })
    }

    pub fn from_config(config: &ViewConfig) -> AppResult<Self> {
        match config.template_dir.as_deref() {
            Some(dir) => Self::from_dir(dir),
            None => Self::embedded(),
        }
    }

    pub fn case_list(&self, cases: &[Case]) -> AppResult<String> {
        let mut context = Context::new();
        context.insert("cases", cases);
        self.render(INDEX, &context)
    }

    pub fn case_detail(&self, overview: &CaseOverview) -> AppResult<String> {
        self.render_serialized(CASE_DETAIL, overview)
    }

    pub fn add_case_form(&self) -> AppResult<String> {
        self.render(ADD_CASE, &Context::new())
    }

    /// 付款表单；`case` 为空时仍以路径中的 ID 渲染
    pub fn add_payment_form(&self, case_id: CaseId, case: Option<&Case>) -> AppResult<String> {
        let mut context = Context::new();
        context.insert("case_id", &case_id);
        context.insert("case", &case);
        self.render(ADD_PAYMENT, &context)
    }

    fn render_serialized<T: Serialize>(&self, template_name: &str, data: &T) -> AppResult<String> {
        let context = Context::from_serialize(data)
            .map_err(|e| AppError::internal(format!("Failed to create template context: {}", e)))?;
        self.render(template_name, &context)
    }

    fn render(&self, template_name: &str, context: &Context) -> AppResult<String> {
        self.tera.render(template_name, context).map_err(|e| {
            AppError::internal(format!("Failed to render template {}: {}", template_name, e))
        })
    }
}
