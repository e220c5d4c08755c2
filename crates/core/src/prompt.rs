const INSTRUCTIONS: &str = "Use the following pieces of context to answer the user's question.\n\
If you don't know the answer, just say that you don't know, don't try to make up an answer.";

const CONTEXT_RULE: &str = "----------------";

/// System message for answer synthesis. Every retrieved passage goes into
/// this one message; the question is sent separately and verbatim.
pub fn system_prompt(context: &[String]) -> String {
    format!("{INSTRUCTIONS}\n{CONTEXT_RULE}\n{}", context.join("\n\n"))
}
