//! Assembles the repair request sent to the oracle.
//!
//! Every request carries the same fixed context — a Pine Script syntax
//! reference, the response-envelope rules, and an assistant acknowledgement —
//! followed by the dynamic prompt with the instruction, the failing code,
//! and the checker's reported error.

use crate::oracle::ChatMessage;

/// Static reference describing Pine Script v5 syntax and the constructs the
/// generated candidates most often get wrong (Python leakage).
pub const PINE_REFERENCE: &str = r#"You are fixing broken Pine Script (version 5). Read this reference, then fix the code you are given.

# Python habits that are invalid in Pine Script

- There are NO lists. Never use `[a, b, c]` literals. Build arrays with
  `array.from(item1, item2, ...)` or `array.new<type>(size, fill)` and read
  them with `my_array.get(index)`.
- `elif` does not exist; write `else if`.
- Dictionaries, tuples-as-values, list comprehensions, `def`, `return`,
  `import` of Python modules, f-strings, and `#` comments do not exist.
- Comments start with `//` and run to end of line.

# Operators

Arithmetic: + - * / %. Comparison: == != > < >= <=. Logical: and, or, not,
and the ternary `cond ? a : b`. Assignment: `=` declares, `:=` reassigns,
plus compound forms += -= *= /= %=.

# Types and storage

Built-in value types: string (single quotes preferred), int, float, bool,
color, line, linefill, box, label, table. Storage forms are `type`,
`type[]`, `array<type>`, `matrix<type>`; these never nest (no
`array<type>[]`, no `matrix<array<int>>`).

# Reserved keywords

import, export, method, type, matrix, var, varip are reserved, plus the
unused reserved words Catch, Class, Do, Ellipse, In, Is, Polygon, Range,
Return, Struct, Text, Throw, Try. None may be used as identifiers.

# User-defined types

Declared with `type Name` followed by an indented field list, one storage
form and field name per line. Field defaults are only allowed for string,
bool, int, float, and color fields and must be a literal, `na`, or a
built-in variable — never an array, function, or another UDT. Instances are
built with `Name.new(...)` and fields are read as `instance.fieldname`.

# Functions

    name(type param1, type param2 = default) =>
        body

- No `function` keyword, no `def`, no `return` — the last expression of the
  block is the value.
- `export` may precede the name in library scripts; `method` may follow it.
- Never use `{` or `}`; blocks are indentation only.

# Script declaration

`//@version=5` must be the first line of every script. The line after it
must declare exactly one of: `library('name')` for exported functions,
`strategy('name')` when any `strategy.*` call is used, otherwise
`indicator('name')`.

# Control flow

    if cond
        ...
    else if other
        ...
    else
        ...

    for i = 0 to 9
        ...

    for [i, item] in my_array
        ...

    while cond
        ...

    switch x
        1 => 'one'
        2 => 'two'
        => 'other'

# Annotations

Doc annotations are comments: `//@description`, `//@type` and `//@field`
for UDTs, `//@function`, `//@param`, `//@returns` for functions.
"#;

/// Response-envelope contract: single delimited block, no banned constructs,
/// and an output statement matched to the value produced.
pub const RESPONSE_RULES: &str = r#"Ensure:
- `//@version=5` is alone on the first line of the code
- exactly one of `library`, `indicator`, or `strategy` declares the script
- no Python code, comments, or syntax anywhere — Pine Script only
- never write `function`, `return`, `{`, or `}`

Respond with ONLY the fixed code between a `//BEGINCOMPLETION` line and a
`//ENDCOMPLETION` line; nothing outside those comments. Write code that is
as concise as possible and never write notes about what you are doing.

Before responding, analyze the entire script for remaining Python syntax and
remove every error, not just the one reported. Use single quotes on strings.
Include one output statement, chosen by the type of the value produced:
- float or int: `plot(value)`
- bool: `plot(0, 'true if green', bool_var ? color.green : color.red)`
- string or array: `label.new(bar_index, close, str.tostring(value))`
"#;

/// Assistant acknowledgement inserted before the user prompt, pinning the
/// expected response shape.
pub const ASSISTANT_ACK: &str = "okay, i will only write the opening comment, the fixed code, and the closing comment, in this format:\n\n//BEGINCOMPLETION\n\n//@version=5\n<script_declaration>('<title>')\n<working_code>\n\n//ENDCOMPLETION\n";

/// Marker inserted where truncation removed the middle of an oversized
/// candidate.
const TRUNCATION_MARKER: &str = "\n// ... truncated ...\n";

/// Build the full message list for one repair request.
///
/// `max_prompt_chars` bounds the dynamic user prompt; when the embedded code
/// would push past it, the middle of the code is cut and marked, keeping the
/// head and tail where the declaration and output statements live.
pub fn build_messages(
    instruction: &str,
    code: &str,
    error: &str,
    max_prompt_chars: usize,
) -> Vec<ChatMessage> {
    let overhead = user_prompt(instruction, "", error).len();
    let budget = max_prompt_chars.saturating_sub(overhead);
    let code = truncate_middle(code, budget);

    vec![
        ChatMessage::system(PINE_REFERENCE),
        ChatMessage::system(RESPONSE_RULES),
        ChatMessage::assistant(ASSISTANT_ACK),
        ChatMessage::user(user_prompt(instruction, &code, error)),
    ]
}

fn user_prompt(instruction: &str, code: &str, error: &str) -> String {
    let error_line = format!("error: {error}");
    [
        "I am trying to produce a script using Pine Script, version 5, fulfilling this instruction:",
        "```text",
        instruction,
        "```",
        "# Error note: more errors are possible, but the compiler only reports the first one found. This is the error I can see from the compiler:",
        error_line.as_str(),
        "# Here is the code. It has numerous errors and non-Pine-Script syntax in it and requires a total fix; consult the reference material before responding.",
        "```",
        code,
        "```",
    ]
    .join("\n")
}

/// Cut the middle of `code` so the result fits in `budget` characters,
/// splitting on a char boundary on each side.
fn truncate_middle(code: &str, budget: usize) -> String {
    if code.len() <= budget {
        return code.to_string();
    }
    if budget <= TRUNCATION_MARKER.len() {
        // The marker is ASCII, so byte slicing is safe.
        let marker = TRUNCATION_MARKER.trim();
        return marker[..budget.min(marker.len())].to_string();
    }
    let keep = budget - TRUNCATION_MARKER.len();
    let mut head_end = keep / 2;
    while !code.is_char_boundary(head_end) {
        head_end -= 1;
    }
    let mut tail_start = code.len() - (keep - head_end);
    while !code.is_char_boundary(tail_start) {
        tail_start += 1;
    }
    format!("{}{}{}", &code[..head_end], TRUNCATION_MARKER, &code[tail_start..])
}
