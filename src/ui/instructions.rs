//! Submission guide
//!
//! Five steps shown as an accordion: every step title is listed and only the
//! selected step shows its body.

use crate::app::App;
use crate::render::DocumentRenderer;
use crate::state::INSTRUCTION_STEPS;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub struct Step {
    pub title: &'static str,
    pub body: &'static [&'static str],
}

pub const STEPS: [Step; INSTRUCTION_STEPS] = [
    Step {
        title: "Step 1: Prepare the Expense Report",
        body: &[
            "Use the XE Travel Expenses Calculator (https://www.xe.com/travel-expenses-calculator/) to prepare an Expense Report. Enter one row per receipt with the correct date, amount, and currency of the transaction, then print it to a PDF file.",
            "",
            "Notes:",
            "  • Set Credit Card to 3%, Debit Card to 5%, Foreign Cash to 5%, and Traveller Cheque to 2%.",
        ],
    },
    Step {
        title: "Step 2: Prepare the Reimbursement Request",
        body: &[
            "Use the Form to generate the Reimbursement Request. Make sure the banking details are accurate; incorrect banking details are a major source of delays. Submitting writes a PDF file locally and sends nothing anywhere.",
            "",
            "Notes:",
            "  • Set currency to the same as in Step 1.",
            "  • Set amount to the same as in Step 1.",
        ],
    },
    Step {
        title: "Step 3: Prepare the Ordered Receipts",
        body: &[
            "Collect your receipts in the same order as the rows of the Expense Report from Step 1 and save them as PDF files. Scan or photograph paper receipts and convert them to PDF.",
        ],
    },
    Step {
        title: "Step 4: Prepare the Submission Package",
        body: &[
            "Combine into a single PDF file, in this order:",
            "  • from Step 2, the Reimbursement Request",
            "  • from Step 1, the Expense Report",
            "  • from Step 3, the Ordered Receipts",
            "",
            "Name it ReimbursementRequest_«YourName»_«IsoDate».pdf, for example ReimbursementRequest_LucaFilipozzi_20181006.pdf.",
            "",
            "Notes:",
            "  • Make sure the whole package is easy to follow; poor quality submissions are a major source of delays.",
            "  • pdfunite from poppler-utils can merge the files:",
            "    pdfunite step2.pdf step1.pdf step3a.pdf ... step3n.pdf output.pdf",
        ],
    },
    Step {
        title: "Step 5: Email the Submission Package",
        body: &[
            "from:        you",
            "to:          treasurer@rt.spi-inc.org (or the address your event organizer gave you)",
            "subject:     Reimbursement Request for «short_description»",
            "attachment:  the PDF file prepared in Step 4",
            "body:        By submitting this reimbursement request, I declare that I:",
            "               • seek reimbursement of expenses that are compliant with SPI and applicable Associated Project policies,",
            "               • have not sought nor will seek reimbursement of these expenses from any other source, and",
            "               • have attached sufficient documentation to substantiate my request.",
            "",
            "Notes:",
            "  • The Associated Project Liaison must approve your request before SPI will process a reimbursement payment.",
            "  • The Liaison may therefore view your Submission Package, including the personal information in it.",
        ],
    },
];

pub fn draw<R: DocumentRenderer>(frame: &mut Frame, area: Rect, app: &App<R>) {
    let selected = app.state.instruction_step;
    let mut lines = Vec::new();

    for (index, step) in STEPS.iter().enumerate() {
        let is_open = index == selected;
        let (marker, style) = if is_open {
            (
                "▼ ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            ("▶ ", Style::default().fg(Color::Gray))
        };
        lines.push(Line::from(Span::styled(format!("{marker}{}", step.title), style)));

        if is_open {
            lines.push(Line::from(""));
            lines.extend(step.body.iter().map(|l| Line::from(format!("  {l}"))));
            lines.push(Line::from(""));
        }
    }

    let block = Block::default()
        .title(" Instructions ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}
