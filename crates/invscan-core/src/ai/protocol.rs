//! OpenAI-compatible chat completion wire types.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::error::AiError;
use super::models::AiInvoice;

pub const TOOL_NAME: &str = "extract_invoice_data";

const SYSTEM_PROMPT: &str = "You are an expert invoice data extraction system. \
Extract structured information from invoice text with high accuracy. \
Always return amounts as numbers without currency symbols.";

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    tools: Vec<Value>,
    tool_choice: Value,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

impl ChatRequest {
    pub fn for_text(model: &str, text: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: "user",
                    content: format!("Extract all invoice information from this text:\n\n{}", text),
                },
            ],
            tools: vec![extraction_tool()],
            tool_choice: json!({
                "type": "function",
                "function": { "name": TOOL_NAME }
            }),
        }
    }
}

fn extraction_tool() -> Value {
    json!({
        "type": "function",
        "function": {
            "name": TOOL_NAME,
            "description": "Extract structured invoice data including line items and totals",
            "parameters": {
                "type": "object",
                "properties": {
                    "invoice_number": { "type": "string", "description": "The invoice number or ID" },
                    "invoice_date": { "type": "string", "description": "The invoice date in YYYY-MM-DD format" },
                    "invoice_time": { "type": "string", "description": "The invoice time in HH:MM format if available" },
                    "due_date": { "type": "string", "description": "The payment due date in YYYY-MM-DD format" },
                    "payment_type": {
                        "type": "string",
                        "description": "Payment method used (e.g., Cash, Card, Credit, Bank Transfer, Check)"
                    },
                    "vendor_name": { "type": "string", "description": "The vendor or supplier company name" },
                    "customer_name": { "type": "string", "description": "The customer or bill-to name" },
                    "line_items": {
                        "type": "array",
                        "description": "Array of individual items on the invoice",
                        "items": {
                            "type": "object",
                            "properties": {
                                "description": { "type": "string", "description": "Item or service description" },
                                "quantity": { "type": "number", "description": "Quantity of items" },
                                "unit_price": { "type": "number", "description": "Price per unit" },
                                "amount": { "type": "number", "description": "Total amount for this line item" },
                                "category": {
                                    "type": "string",
                                    "description": "Item category (e.g., Food & Beverages, Office Supplies, Services, Hardware, Software, Travel, Utilities)"
                                }
                            },
                            "required": ["description", "amount"]
                        }
                    },
                    "subtotal": { "type": "number", "description": "Subtotal before tax and discounts" },
                    "discount": { "type": "number", "description": "Discount amount applied" },
                    "tax": { "type": "number", "description": "Tax amount" },
                    "total": { "type": "number", "description": "Final total amount" },
                    "notes": {
                        "type": "string",
                        "description": "Additional notes or observations about the invoice (e.g., payment terms, special instructions, irregularities)"
                    }
                },
                "required": ["line_items", "total"]
            }
        }
    })
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    function: FunctionCall,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    arguments: String,
}

fn error_message(error: &Value) -> String {
    error
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| error.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string())
}

/// Decode a successful completion body into an invoice.
///
/// Uses the first tool call of the first choice.
pub fn parse_completion(body: &str) -> Result<AiInvoice, AiError> {
    let response: ChatResponse = serde_json::from_str(body).map_err(AiError::InvalidPayload)?;

    if let Some(error) = response.error.as_ref().filter(|e| !e.is_null()) {
        return Err(AiError::Remote(error_message(error)));
    }

    let call = response
        .choices
        .first()
        .and_then(|choice| choice.message.tool_calls.first())
        .ok_or(AiError::NoToolCall)?;

    serde_json::from_str(&call.function.arguments).map_err(AiError::InvalidPayload)
}
