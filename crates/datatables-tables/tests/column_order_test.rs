//! Column order properties

use datatables_tables::prelude::*;
use proptest::prelude::*;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

struct Generated {
	fields: Vec<String>,
	rows: MemoryDataSource,
}

impl TableDefinition for Generated {
	fn build_columns(&self, builder: &mut ColumnBuilder) -> Result<()> {
		for field in &self.fields {
			builder.add(field.as_str(), ColumnSpec::text(field.to_uppercase()))?;
		}
		Ok(())
	}

	fn data_iterator(&self, request: Option<&PaginateRequest>) -> Result<RowIter<'_>> {
		self.rows.iterate(request)
	}

	fn unfiltered_count(&self) -> Result<u64> {
		self.rows.count_all()
	}

	fn filtered_count(&self, request: Option<&PaginateRequest>) -> Result<Option<u64>> {
		self.rows.count_filtered(request)
	}
}

fn distinct_fields() -> impl Strategy<Value = Vec<String>> {
	prop::collection::vec("[a-z]{1,6}", 1..8).prop_map(|fields| {
		let mut seen = BTreeSet::new();
		fields
			.into_iter()
			.filter(|field| seen.insert(field.clone()))
			.collect()
	})
}

proptest! {
	#[test]
	fn columns_and_rows_keep_declaration_order(fields in distinct_fields(), row_count in 0usize..5) {
		let rows = (0..row_count)
			.map(|i| {
				fields
					.iter()
					.map(|field| (field.clone(), Value::from(format!("{field}{i}"))))
					.collect::<Map<String, Value>>()
			})
			.collect();
		let table = DataTable::builder(Generated { fields: fields.clone(), rows: MemoryDataSource::new(rows) })
			.table_id("generated")
			.unwrap()
			.build()
			.unwrap();

		let client_fields: Vec<String> = table.client_side_columns().keys().cloned().collect();
		prop_assert_eq!(&client_fields, &fields);

		let output = table.output_rows().unwrap();
		prop_assert_eq!(output.len(), row_count);
		for (i, row) in output.iter().enumerate() {
			let row_fields: Vec<String> = row.keys().cloned().collect();
			prop_assert_eq!(&row_fields, &fields);
			for field in &fields {
				prop_assert_eq!(&row[field.as_str()], &format!("{field}{i}"));
			}
		}
	}
}
