//! Static prompt content served by the tools.

use std::collections::HashMap;

use super::error::PromptError;
use super::templates::PromptTemplate;

/// Question sent to the translator to discover the locations of a place.
pub const DISCOVERY_QUESTION: PromptTemplate = PromptTemplate::new(
    "discovery_question",
    &["location"],
    "show all measurement locations in {{location}}",
);

/// Render [`DISCOVERY_QUESTION`] for `location`.
pub fn discovery_question(location: &str) -> Result<String, PromptError> {
    DISCOVERY_QUESTION.render(&HashMap::from([("location", location)]))
}

/// Instructions handed to the chat agent by `get_system_prompt`.
pub const SYSTEM_PROMPT: &str = "\
You answer questions about environmental measurements stored in a knowledge graph.

Work through the following tools, in this order, for every new question:

1. discover_locations(location): find the measurement locations in the place the
   user mentions. Show the returned locations on a map and ask the user which
   ones they are interested in.
2. select_locations(locationIds): remember the locations the user picked. Pass the
   identifiers exactly as returned by discover_locations.
3. translate_nl_to_sparql(question): turn the user's question into a SPARQL query.
   The selected locations are added to the question automatically.
4. execute_sparql_query(query): run the query returned by the previous step. You may
   also run a query the user supplies directly.
5. format_sparql_results(results, queryType): present the rows. Use \"map\" when the
   rows carry coordinates, \"table\" for plain values and \"auto\" when unsure.

Every call on the same conversation must carry the same threadId.

When a tool fails, the error names the service that failed (Translator, GraphQuery or
Formatter) and why (Timeout, Unreachable, BadResponse or Rejected). Tell the user what
went wrong. If only formatting failed, show the raw rows instead. Never invent
measurement values that no query returned.
";
