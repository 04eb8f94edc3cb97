use std::collections::HashMap;

use askama::Template;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::{AppError, AppResult};
use crate::models::Parameter;
use crate::services::catalog::ExportEntry;
use crate::services::example::generate_example;

/// Language of the exported document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    En,
    #[default]
    Zh,
}

impl Locale {
    /// `zh` and `en` are recognised; anything else falls back to English.
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "zh" => Locale::Zh,
            _ => Locale::En,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Zh => "zh",
        }
    }

    fn labels(&self) -> &'static Labels {
        match self {
            Locale::En => &EN,
            Locale::Zh => &ZH,
        }
    }
}

struct Labels {
    title: &'static str,
    generated_at: &'static str,
    table_of_contents: &'static str,
    request_parameters: &'static str,
    response_parameters: &'static str,
    request_example: &'static str,
    response_example: &'static str,
    name: &'static str,
    param_type: &'static str,
    required: &'static str,
    optional: &'static str,
    description: &'static str,
    no_parameters: &'static str,
    ungrouped: &'static str,
}

static EN: Labels = Labels {
    title: "API Documentation",
    generated_at: "Generated at",
    table_of_contents: "Table of Contents",
    request_parameters: "Request Parameters",
    response_parameters: "Response Parameters",
    request_example: "Request Example",
    response_example: "Response Example",
    name: "Name",
    param_type: "Type",
    required: "Required",
    optional: "Optional",
    description: "Description",
    no_parameters: "No parameters",
    ungrouped: "Ungrouped",
};

static ZH: Labels = Labels {
    title: "API 文档",
    generated_at: "生成时间",
    table_of_contents: "目录",
    request_parameters: "请求参数",
    response_parameters: "响应参数",
    request_example: "请求示例",
    response_example: "响应示例",
    name: "名称",
    param_type: "类型",
    required: "必填",
    optional: "可选",
    description: "描述",
    no_parameters: "无参数",
    ungrouped: "未分组",
};

struct SidebarItem<'a> {
    anchor: usize,
    name: &'a str,
}

struct SidebarGroup<'a> {
    name: &'a str,
    items: Vec<SidebarItem<'a>>,
}

struct ParamRow<'a> {
    name: &'a str,
    type_name: &'a str,
    required: bool,
    description: &'a str,
    nested: bool,
    indent_px: usize,
}

struct ApiSection<'a> {
    anchor: usize,
    name: &'a str,
    method: &'a str,
    method_class: String,
    endpoint: &'a str,
    api_type: &'a str,
    note: Option<&'a str>,
    request_rows: Vec<ParamRow<'a>>,
    response_rows: Vec<ParamRow<'a>>,
    request_example: Option<String>,
    response_example: Option<String>,
}

#[derive(Template)]
#[template(path = "export.html")]
struct ExportTemplate<'a> {
    lang: &'static str,
    labels: &'static Labels,
    generated_at: String,
    groups: Vec<SidebarGroup<'a>>,
    sections: Vec<ApiSection<'a>>,
}

/// Render the standalone HTML document for an export.
///
/// Entries appear in the order given; the table of contents groups them by
/// group in order of first appearance.
pub fn render_html(
    entries: &[ExportEntry],
    locale: Locale,
    generated_at: OffsetDateTime,
) -> AppResult<String> {
    let labels = locale.labels();

    let mut groups: Vec<SidebarGroup<'_>> = Vec::new();
    let mut group_slots: HashMap<Option<i32>, usize> = HashMap::new();
    for (anchor, entry) in entries.iter().enumerate() {
        // Entries without a group row all share the fallback heading
        let key = entry.group_name.as_ref().map(|_| entry.api.group_id);
        let slot = *group_slots.entry(key).or_insert_with(|| {
            groups.push(SidebarGroup {
                name: entry.group_name.as_deref().unwrap_or(labels.ungrouped),
                items: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].items.push(SidebarItem {
            anchor,
            name: &entry.api.name,
        });
    }

    let sections = entries
        .iter()
        .enumerate()
        .map(|(anchor, entry)| {
            Ok(ApiSection {
                anchor,
                name: &entry.api.name,
                method: &entry.api.method,
                method_class: entry.api.method.to_lowercase(),
                endpoint: &entry.api.endpoint,
                api_type: &entry.api.api_type,
                note: entry.api.note.as_deref().filter(|n| !n.trim().is_empty()),
                request_rows: param_rows(&entry.request_parameters),
                response_rows: param_rows(&entry.response_parameters),
                request_example: pretty_example(&entry.request_parameters)?,
                response_example: pretty_example(&entry.response_parameters)?,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    let generated_at = generated_at
        .format(&Rfc3339)
        .map_err(|e| AppError::Internal(format!("Failed to format export time: {}", e)))?;

    let template = ExportTemplate {
        lang: locale.as_str(),
        labels,
        generated_at,
        groups,
        sections,
    };

    template
        .render()
        .map_err(|e| AppError::Internal(format!("Failed to render export: {}", e)))
}

/// Table rows for a forest, parents directly above their children
fn param_rows(forest: &[Parameter]) -> Vec<ParamRow<'_>> {
    let mut rows = Vec::new();
    let mut stack: Vec<(&Parameter, usize)> = forest.iter().rev().map(|p| (p, 0)).collect();

    while let Some((param, depth)) = stack.pop() {
        rows.push(ParamRow {
            name: &param.name,
            type_name: param.param_type.as_str(),
            required: param.required,
            description: param.description_text().unwrap_or("-"),
            nested: depth > 0,
            indent_px: 12 + depth * 20,
        });
        stack.extend(param.children.iter().rev().map(|c| (c, depth + 1)));
    }

    rows
}

fn pretty_example(forest: &[Parameter]) -> AppResult<Option<String>> {
    if forest.is_empty() {
        return Ok(None);
    }
    let text = serde_json::to_string_pretty(&generate_example(forest))?;
    Ok(Some(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Api, Direction, ParamKind};

    fn api(id: i32, group_id: i32, name: &str) -> Api {
        let now = OffsetDateTime::now_utc();
        Api {
            id,
            group_id,
            name: name.to_string(),
            endpoint: format!("/api/{}", name),
            method: "POST".to_string(),
            api_type: "HTTP".to_string(),
            order: id,
            note: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn param(id: i32, name: &str, kind: ParamKind, children: Vec<Parameter>) -> Parameter {
        let now = OffsetDateTime::now_utc();
        Parameter {
            id,
            api_id: 1,
            parent_id: None,
            name: name.to_string(),
            param_type: kind,
            description: None,
            required: false,
            direction: Direction::Request,
            order: id,
            created_at: now,
            updated_at: now,
            children,
        }
    }

    fn entry(api: Api, group_name: Option<&str>, request: Vec<Parameter>) -> ExportEntry {
        ExportEntry {
            api,
            group_name: group_name.map(str::to_string),
            request_parameters: request,
            response_parameters: Vec::new(),
        }
    }

    #[test]
    fn test_locale_parse() {
        assert_eq!(Locale::parse("zh"), Locale::Zh);
        assert_eq!(Locale::parse("EN"), Locale::En);
        assert_eq!(Locale::parse("fr"), Locale::En);
        assert_eq!(Locale::default(), Locale::Zh);
    }

    #[test]
    fn test_render_escapes_user_text() {
        let mut risky = api(1, 1, "login");
        risky.name = "<script>alert(1)</script>".to_string();
        let mut described = param(1, "token", ParamKind::String, vec![]);
        described.description = Some("a & b".to_string());

        let html = render_html(
            &[entry(risky, Some("Auth <v1>"), vec![described])],
            Locale::En,
            OffsetDateTime::now_utc(),
        )
        .unwrap();

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("Auth <v1>"));
        assert!(html.contains("a &amp; b"));
    }

    #[test]
    fn test_render_groups_and_fallback() {
        let entries = vec![
            entry(api(1, 2, "second_group_api"), Some("Orders"), vec![]),
            entry(api(2, 1, "first_group_api"), Some("Users"), vec![]),
            entry(api(3, 2, "another_order_api"), Some("Orders"), vec![]),
            entry(api(4, 9, "orphan"), None, vec![]),
        ];

        let html = render_html(&entries, Locale::En, OffsetDateTime::now_utc()).unwrap();

        let orders = html.find("Orders").unwrap();
        let users = html.find("Users").unwrap();
        let ungrouped = html.find("Ungrouped").unwrap();
        assert!(orders < users && users < ungrouped);
        assert_eq!(html.matches("class=\"sidebar-group-title\"").count(), 3);
        assert!(html.contains("id=\"api-3\""));
        assert!(html.contains("No parameters"));
    }

    #[test]
    fn test_render_nested_params_and_example() {
        let user = param(
            1,
            "user",
            ParamKind::Object,
            vec![param(2, "id", ParamKind::Number, vec![])],
        );

        let html = render_html(
            &[entry(api(1, 1, "create"), Some("Users"), vec![user])],
            Locale::Zh,
            OffsetDateTime::now_utc(),
        )
        .unwrap();

        assert!(html.contains("<html lang=\"zh\">"));
        assert!(html.contains("请求参数"));
        assert!(html.contains("└─ id"));
        assert!(html.contains("&quot;user&quot;") || html.contains("&#34;user&#34;"));
        assert!(html.find("user").unwrap() < html.find("└─ id").unwrap());
    }
}
