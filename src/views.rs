//! Server-rendered pages for the MVC frontend.

use axum::response::Html;

use crate::models::Item;

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{} - Todo</title>\n</head>\n<body>\n<h1>{}</h1>\n{}\n<p><a href=\"/\">Back to list</a></p>\n</body>\n</html>\n",
        escape(title),
        escape(title),
        body
    )
}

pub(crate) fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn error_banner(error: Option<&str>) -> String {
    match error {
        Some(message) => format!("<p class=\"error\">{}</p>\n", escape(message)),
        None => String::new(),
    }
}

fn item_fields(item: Option<&Item>) -> String {
    let (id, name, description, checked) = match item {
        Some(item) => (
            item.id.as_str(),
            item.name.as_str(),
            item.description.as_deref().unwrap_or(""),
            if item.completed { " checked" } else { "" },
        ),
        None => ("", "", "", ""),
    };
    format!(
        "<input type=\"hidden\" name=\"id\" value=\"{}\">\n<p><label>Name <input name=\"name\" value=\"{}\"></label></p>\n<p><label>Description <input name=\"description\" value=\"{}\"></label></p>\n<p><label>Completed <input type=\"checkbox\" name=\"completed\"{}></label></p>\n",
        escape(id),
        escape(name),
        escape(description),
        checked
    )
}

pub fn index_page(items: &[Item], values: &[String]) -> Html<String> {
    let mut rows = String::new();
    for item in items {
        rows.push_str(&format!(
            "<tr><td><a href=\"/item/details/{id}\">{name}</a></td><td>{description}</td><td><a href=\"/item/edit/{id}\">Edit</a> <a href=\"/item/delete/{id}\">Delete</a></td></tr>\n",
            id = escape(&item.id),
            name = escape(&item.name),
            description = escape(item.description.as_deref().unwrap_or("")),
        ));
    }

    let mut values_list = String::new();
    for value in values {
        values_list.push_str(&format!("<li>{}</li>\n", escape(value)));
    }

    let body = format!(
        "<p><a href=\"/item/create\">Create new</a></p>\n<table>\n<tr><th>Name</th><th>Description</th><th></th></tr>\n{rows}</table>\n<h2>Values</h2>\n<ul>\n{values_list}</ul>\n"
    );
    Html(layout("Open items", &body))
}

pub fn create_page(error: Option<&str>) -> Html<String> {
    let body = format!(
        "{}<form method=\"post\" action=\"/item/create\">\n{}<p><button type=\"submit\">Create</button></p>\n</form>\n",
        error_banner(error),
        item_fields(None)
    );
    Html(layout("Create item", &body))
}

pub fn edit_page(item: &Item, error: Option<&str>) -> Html<String> {
    let body = format!(
        "{}<form method=\"post\" action=\"/item/edit\">\n{}<p><button type=\"submit\">Save</button></p>\n</form>\n",
        error_banner(error),
        item_fields(Some(item))
    );
    Html(layout("Edit item", &body))
}

pub fn delete_page(item: &Item) -> Html<String> {
    let body = format!(
        "<p>Delete \"{}\"?</p>\n<form method=\"post\" action=\"/item/delete\">\n<input type=\"hidden\" name=\"id\" value=\"{}\">\n<p><button type=\"submit\">Delete</button></p>\n</form>\n",
        escape(&item.name),
        escape(&item.id)
    );
    Html(layout("Delete item", &body))
}

pub fn details_page(item: &Item) -> Html<String> {
    let body = format!(
        "<dl>\n<dt>Id</dt><dd>{}</dd>\n<dt>Name</dt><dd>{}</dd>\n<dt>Description</dt><dd>{}</dd>\n<dt>Completed</dt><dd>{}</dd>\n</dl>\n",
        escape(&item.id),
        escape(&item.name),
        escape(item.description.as_deref().unwrap_or("")),
        item.completed
    );
    Html(layout("Item details", &body))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> Item {
        Item {
            id: "1".to_string(),
            name: "Buy <milk>".to_string(),
            description: Some("2 \"liters\"".to_string()),
            completed: false,
        }
    }

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(escape("a<b>&\"'"), "a&lt;b&gt;&amp;&quot;&#39;");
    }

    #[test]
    fn index_lists_items_and_values() {
        let Html(page) = index_page(&[item()], &["Water Bottle - 30 oz.".to_string()]);
        assert!(page.contains("Buy &lt;milk&gt;"));
        assert!(page.contains("/item/edit/1"));
        assert!(page.contains("Water Bottle"));
    }

    #[test]
    fn edit_page_prefills_fields() {
        let Html(page) = edit_page(&item(), None);
        assert!(page.contains("value=\"1\""));
        assert!(page.contains("value=\"Buy &lt;milk&gt;\""));
        assert!(!page.contains("class=\"error\""));
    }

    #[test]
    fn create_page_shows_error_banner() {
        let Html(page) = create_page(Some("Name is required"));
        assert!(page.contains("class=\"error\""));
        assert!(page.contains("Name is required"));
    }
}
