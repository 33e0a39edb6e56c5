//! Validation of user-supplied conference filters.
//!
//! Turns `{field, operator, value}` forms into a [`ConferenceQuery`] the
//! store can run. Like session queries, conference queries allow inequality
//! operators on one field only.

use confcentral_types::conference::{
    ConferenceField, ConferenceQueryForm, Operator,
};
use confcentral_types::error::ConferenceError;

use crate::repository::conference::{ConferenceFilter, ConferenceQuery, FilterValue};

/// Parse, check and type the submitted filters.
pub fn plan_conference_query(
    forms: &[ConferenceQueryForm],
) -> Result<ConferenceQuery, ConferenceError> {
    let mut query = ConferenceQuery::default();

    for form in forms {
        let (field, operator) = match (
            form.field.parse::<ConferenceField>(),
            form.operator.parse::<Operator>(),
        ) {
            (Ok(field), Ok(operator)) => (field, operator),
            _ => {
                return Err(ConferenceError::InvalidArgument(
                    "Filter contains invalid field or operator.".to_string(),
                ));
            }
        };

        if field == ConferenceField::Topic && operator != Operator::Eq {
            return Err(ConferenceError::InvalidArgument(
                "TOPIC filters only support the EQ operator.".to_string(),
            ));
        }

        if operator.is_inequality() {
            match query.inequality_field {
                Some(existing) if existing != field => {
                    return Err(ConferenceError::InvalidArgument(
                        "Inequality filter is allowed on only one field.".to_string(),
                    ));
                }
                _ => query.inequality_field = Some(field),
            }
        }

        let value = if field.is_numeric() {
            let n = form.value.trim().parse::<i64>().map_err(|_| {
                ConferenceError::InvalidArgument(format!(
                    "{field} filter expects an integer, got '{}'",
                    form.value
                ))
            })?;
            FilterValue::Integer(n)
        } else {
            FilterValue::Text(form.value.clone())
        };

        query.filters.push(ConferenceFilter {
            field,
            operator,
            value,
        });
    }

    Ok(query)
}
