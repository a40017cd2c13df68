//! Server-side rendering of the single notes page.
use notes_core::Note;

const STYLE: &str = r#"
body { font-family: sans-serif; text-align: center; background: #f9fafb; }
h1 { color: #0369a1; font-size: 3.75rem; margin-bottom: 1.25rem; }
form.create { max-width: 64rem; margin: 2.5rem auto; padding: 2rem; background: #f3f4f6;
  border-radius: 0.75rem; display: flex; gap: 1rem; justify-content: center; align-items: end; }
.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(18rem, 1fr)); gap: 1.5rem;
  margin: 3rem 1rem; }
.note { display: flex; flex-direction: column; align-items: center; background: #fff;
  padding: 1rem; border-radius: 0.375rem; box-shadow: 0 1px 3px rgba(0,0,0,.2); }
.note img { max-width: 350px; width: 100%; height: auto; margin-bottom: 1rem; }
.note strong { font-size: 1.25rem; margin-bottom: 0.5rem; }
.muted { color: #6b7280; font-size: 0.875rem; margin-bottom: 1rem; }
button.link { background: none; border: none; color: #ef4444; cursor: pointer; }
"#;

/// Escape text for inclusion in HTML element content or double-quoted attribute values.
pub(crate) fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

pub(crate) fn render(notes: &[Note]) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>My Notes App</title>\n<style>");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n<h1>My Notes App</h1>\n");
    html.push_str(FORM);
    html.push_str("<h2>Current Notes</h2>\n<div class=\"grid\">\n");
    for note in notes {
        render_note(&mut html, note);
    }
    html.push_str("</div>\n");
    html.push_str(
        "<form method=\"post\" action=\"/signout\"><button type=\"submit\">Sign Out</button></form>\n",
    );
    html.push_str("</body>\n</html>\n");
    html
}

// The hidden file input is opened by the visible "Upload a file" button; picking a file only
// displays its name, the upload itself happens when the form is submitted.
const FORM: &str = r#"<form class="create" method="post" action="/notes" enctype="multipart/form-data">
<input name="name" placeholder="Note Name" aria-label="Note Name" required>
<input name="description" placeholder="Note Description" aria-label="Note Description" required>
<button type="button" onclick="document.getElementById('image').click()">Upload a file</button>
<input id="image" name="image" type="file" style="display:none"
  onchange="document.getElementById('selected-file').textContent = this.files.length ? this.files[0].name : ''">
<span id="selected-file" class="muted"></span>
<button type="submit">Create Note</button>
</form>
"#;

fn render_note(html: &mut String, note: &Note) {
    html.push_str("<div class=\"note\">\n");
    if let Some(url) = note.image.as_ref().and_then(|i| i.url()) {
        html.push_str(&format!(
            "<img src=\"{}\" alt=\"visual aid for {}\">\n",
            escape(url),
            escape(&note.name)
        ));
    }
    html.push_str(&format!(
        "<strong>{}</strong>\n",
        escape(&note.display_name())
    ));
    html.push_str(&format!(
        "<span class=\"muted\">{}</span>\n",
        escape(&note.description)
    ));
    if let Some(id) = &note.id {
        html.push_str(&format!(
            "<form method=\"post\" action=\"/notes/{}/delete\"><button class=\"link\" type=\"submit\">Delete note</button></form>\n",
            escape(&urlencoding::encode(id.as_str()))
        ));
    }
    html.push_str("</div>\n");
}
