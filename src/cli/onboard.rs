//! Onboarding tutorial content for chainql CLI

/// Get the onboarding tutorial content
pub fn get_onboarding_content() -> &'static str {
    r#"WELCOME TO CHAINQL

chainql turns a chain of steps into MongoDB query and update documents.

STEP 1: A SOURCE
----------------
Every chain starts at a source: $ or a named collection.

  chainql compile '$people'
  => {"query":{}}

STEP 2: FILTERING
-----------------
where() takes a lambda. @p is the current document.

  chainql compile '$people.where(@p => @p.age > 18)'
  => {"query":{"age":{"$gt":18}}}

STEP 3: UPDATING
----------------
Mutations add an update document.

  chainql compile '$people.where(@p => @p.name == "Ann").inc(@p => @p.visits, 1)'
  => {"query":{"name":"Ann"},"update":{"$inc":{"visits":1}}}

STEP 4: ARITHMETIC AND ABSENCE
------------------------------
set() picks the operator from the value.

  chainql compile '$.set(@p => @p.n, @p.n - 2).set(@p => @p.tmp, absent)'
  => {"query":{},"update":{"$inc":{"n":-2},"$unset":{"tmp":1}}}

STEP 5: BOUNDED LISTS
---------------------
Modifiers shape a push_each.

  chainql compile '$.push_each(@p => @p.xs, [1, 2, 3]).slice(5).sort_by(@e => @e.a)'
  => {"query":{},"update":{"$push":{"xs":{"$each":[1,2,3],"$slice":-5,"$sort":{"a":1}}}}}

NEXT STEPS
----------
  chainql docs              List all documentation categories
  chainql doc predicates    Query operators
  chainql doc mutations     Update operators
  chainql doc modifiers     slice and sorting
"#
}
