use super::Attachment;

const BOOTSTRAP_CSS: &str = "https://cdnjs.cloudflare.com/ajax/libs/bootstrap/5.3.2/css/bootstrap.min.css";

/// Attachment extensions that trigger the delimited-text parsing instructions.
const TABULAR_EXTENSIONS: &[&str] = &["csv", "tsv"];

const TABULAR_INSTRUCTIONS: &str = "\
TABULAR DATA HANDLING (CRITICAL):
- Include: <script src=\"https://cdnjs.cloudflare.com/ajax/libs/PapaParse/5.4.1/papaparse.min.js\"></script>
- Parse: Papa.parse(text, {header: true, dynamicTyping: true, skipEmptyLines: true, delimitersToGuess: [',', '\\t', '|']})
- NEVER assume column names - read the headers from the parsed data
- Trim whitespace from headers: Object.keys(parsed.data[0]).map(k => k.trim())
- Coerce numbers explicitly: rows.reduce((sum, row) => sum + (parseFloat(row[col]) || 0), 0)
- Treat missing or null values as 0
";

pub fn has_tabular_attachment(attachments: &[Attachment]) -> bool {
    attachments.iter().any(|att| {
        att.name
            .rsplit_once('.')
            .is_some_and(|(_, ext)| TABULAR_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
    })
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prompt asking for the complete single-file page.
pub fn page_prompt(brief: &str, attachments: &[Attachment], checks: &[String]) -> String {
    let mut attachment_info = String::new();
    if !attachments.is_empty() {
        attachment_info.push_str("\nATTACHMENTS:\n");
        for att in attachments {
            attachment_info.push_str(&format!("- {}: Use data URL directly in fetch()\n", att.name));
        }
    }

    let tabular = if has_tabular_attachment(attachments) {
        TABULAR_INSTRUCTIONS
    } else {
        ""
    };

    let fetch_target = attachments.first().map_or("", |att| att.url.as_str());

    format!(
        "Create a complete, working single-page HTML application.
TASK: {brief}
{attachment_info}
{tabular}
EVALUATION CHECKS (MUST PASS):
{checks}
TECHNICAL SPECS:
- ONE HTML file with inline CSS/JS
- Bootstrap 5: {BOOTSTRAP_CSS}
- For data URLs: fetch('{fetch_target}').then(r => r.text())
- Match ALL element IDs/classes in checks exactly
- Professional UI, no placeholders
- All functionality must work on first load
CRITICAL: Return ONLY the HTML. Start with <!DOCTYPE html>, end with </html>. No markdown blocks.",
        checks = bullet_list(checks),
    )
}

/// Prompt asking for the repository README.
pub fn readme_prompt(task: &str, brief: &str, checks: &[String]) -> String {
    format!(
        "Generate a professional README.md for a GitHub project with these details:
**Project Name:** {task}
**Purpose:** {brief}
**Requirements to highlight:**
{checks}
Create a README with these sections:
1. **Title** - Short, descriptive project name
2. **Overview** - 2-3 sentences explaining what it does
3. **Features** - Bullet list of key capabilities based on the requirements
4. **How to Use** - Step-by-step user instructions
5. **Technology Stack** - List all libraries/frameworks used
6. **Project Structure** - Show the file tree
7. **Local Development** - Clone and run using git clone
8. **License** - Mention MIT License
CRITICAL RULES:
- Use actual URLs, not placeholders like [GitHub Pages URL]
- Be specific about what the app does based on the brief
- Keep it professional - no \"auto-generated\" footers
- Use markdown formatting properly
- Length: 150-250 words
Return the markdown content directly without wrapping it in triple backticks or code fences.",
        checks = bullet_list(checks),
    )
}
