//! Conversation session: ordered turn history for one user

use chrono::NaiveDate;

use crate::model::ChatTurn;

/// A single user's conversation with the assistant.
///
/// Holds the ordered turn history, seeded with the system prompt. Turns are
/// only ever appended; the dispatch loop owns all mutation within a turn.
pub struct ConversationSession {
    id: String,
    turns: Vec<ChatTurn>,
}

impl ConversationSession {
    /// New session with the system prompt dated today.
    pub fn new() -> Self {
        Self::with_today(chrono::Local::now().date_naive())
    }

    /// New session with an explicit "today"; lets tests pin the prompt.
    pub fn with_today(today: NaiveDate) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            turns: vec![ChatTurn::system(system_prompt(today))],
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn push(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Number of turns including the system prompt.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new()
    }
}

fn system_prompt(today: NaiveDate) -> String {
    format!(
        "You are an HR assistant with access to the organization's HR system. \
Today's date is {today}.

You can look up approved leave records, daily attendance, and employee master data \
(manager, email, designation, department), and you can find people by name when the \
user does not know an employee id.

Guidelines:
1. For questions about leaves or absences, determine the employee id and date range, \
then use get_leave_report.
2. For questions about a person's profile (manager, email, designation, team), use \
get_employee_info when you have ids, or get_employee_details_by_name when you only \
have a name.
3. Interpret relative dates against today's date: 'last month' is the previous \
calendar month, 'this month' the current one, 'last week' the previous 7 days, \
'this year' the current calendar year.
4. All dates passed to operations must be in YYYY-MM-DD format.
5. If required parameters are missing, ask a clarifying question instead of guessing.
6. When an operation result comes back, summarize the relevant data in plain, \
user-friendly language; never show raw JSON or internal error descriptors verbatim.
7. If an operation fails, explain in one or two sentences what went wrong and what \
the user can do about it.
8. When a name lookup returns several candidates, list them briefly and ask which \
one the user meant; never pick one yourself.",
        today = today.format("%Y-%m-%d"),
    )
}
