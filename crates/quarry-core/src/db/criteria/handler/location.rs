use crate::{
    db::{
        criteria::{
            CriterionError, CriterionHandler, LeafCriterion, Operator, Target,
            handler::{membership_values, text_values},
        },
        schema::{SharedJoin, tree_node},
        sql::{Fragment, QueryContext, compare::compare, like},
    },
    error::InternalError,
    value::Value,
};

/// `<id> [NOT] IN (SELECT t.content_id FROM tree_node AS t WHERE <predicate>)`.
fn tree_subselect(
    ctx: &mut QueryContext<'_>,
    negate: bool,
    predicate: impl FnOnce(&mut QueryContext<'_>, &str) -> Fragment,
) -> Fragment {
    let alias = ctx.next_alias("t");
    let predicate = predicate(ctx, &alias);
    let membership = if negate { "NOT IN" } else { "IN" };

    Fragment::new(format!(
        "{} {membership} (SELECT {alias}.{} FROM {} AS {alias} WHERE {predicate})",
        ctx.id_column(),
        tree_node::CONTENT_ID,
        tree_node::TABLE,
    ))
}

///
/// NodeHandler
/// Entities with a location whose node (or parent node) id is in the list.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NodeHandler {
    name: &'static str,
    target: Target,
    column: &'static str,
}

impl NodeHandler {
    #[must_use]
    pub const fn location_id() -> Self {
        Self {
            name: "location_id",
            target: Target::LocationId,
            column: tree_node::NODE_ID,
        }
    }

    #[must_use]
    pub const fn parent_location_id() -> Self {
        Self {
            name: "parent_location_id",
            target: Target::ParentLocationId,
            column: tree_node::PARENT_NODE_ID,
        }
    }
}

impl CriterionHandler for NodeHandler {
    fn name(&self) -> &'static str {
        self.name
    }

    fn accepts(&self, leaf: &LeafCriterion) -> bool {
        leaf.target == self.target
    }

    fn build(
        &self,
        ctx: &mut QueryContext<'_>,
        leaf: &LeafCriterion,
    ) -> Result<Fragment, InternalError> {
        let values = membership_values(leaf)?;
        if values.is_empty() {
            return Ok(Fragment::always_false());
        }

        Ok(tree_subselect(ctx, false, |ctx, alias| {
            ctx.in_list(&format!("{alias}.{}", self.column), values)
        }))
    }
}

///
/// SubtreeHandler
///
/// Entities located anywhere below one of the given materialized paths,
/// the path's own node included. The permission variant compiles the same
/// way and exists so policy code can replace it independently.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubtreeHandler {
    name: &'static str,
    target: Target,
}

impl SubtreeHandler {
    #[must_use]
    pub const fn subtree() -> Self {
        Self {
            name: "subtree",
            target: Target::Subtree,
        }
    }

    #[must_use]
    pub const fn permission_subtree() -> Self {
        Self {
            name: "permission_subtree",
            target: Target::PermissionSubtree,
        }
    }
}

impl CriterionHandler for SubtreeHandler {
    fn name(&self) -> &'static str {
        self.name
    }

    fn accepts(&self, leaf: &LeafCriterion) -> bool {
        leaf.target == self.target
    }

    fn build(
        &self,
        ctx: &mut QueryContext<'_>,
        leaf: &LeafCriterion,
    ) -> Result<Fragment, InternalError> {
        let paths = text_values(leaf)?;
        if paths.is_empty() {
            return Ok(Fragment::always_false());
        }

        Ok(tree_subselect(ctx, false, |ctx, alias| {
            let column = format!("{alias}.{}", tree_node::PATH_STRING);
            let prefixes = paths
                .iter()
                .map(|path| {
                    let placeholder = ctx.bind(like::prefix(path));
                    Fragment::new(like::predicate(&column, &placeholder))
                })
                .collect();
            Fragment::or(prefixes)
        }))
    }
}

///
/// AncestorHandler
///
/// Entities located on any node of the given paths: `/1/2/54/` names nodes
/// 1, 2 and 54.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct AncestorHandler;

impl AncestorHandler {
    fn node_ids(leaf: &LeafCriterion, path: &str) -> Result<Vec<i64>, CriterionError> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                segment.parse::<i64>().map_err(|_| {
                    CriterionError::invalid_value(
                        &leaf.target,
                        format!("'{path}' is not a materialized path"),
                    )
                })
            })
            .collect()
    }
}

impl CriterionHandler for AncestorHandler {
    fn name(&self) -> &'static str {
        "ancestor"
    }

    fn accepts(&self, leaf: &LeafCriterion) -> bool {
        leaf.target == Target::Ancestor
    }

    fn build(
        &self,
        ctx: &mut QueryContext<'_>,
        leaf: &LeafCriterion,
    ) -> Result<Fragment, InternalError> {
        let mut ids = Vec::new();
        for path in text_values(leaf)? {
            for id in Self::node_ids(leaf, &path)? {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        if ids.is_empty() {
            return Ok(Fragment::always_false());
        }

        Ok(tree_subselect(ctx, false, |ctx, alias| {
            ctx.in_list(
                &format!("{alias}.{}", tree_node::NODE_ID),
                ids.into_iter().map(Value::from).collect(),
            )
        }))
    }
}

///
/// VisibilityHandler
///
/// `true`: at least one visible location. `false`: no visible location.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct VisibilityHandler;

impl CriterionHandler for VisibilityHandler {
    fn name(&self) -> &'static str {
        "visibility"
    }

    fn accepts(&self, leaf: &LeafCriterion) -> bool {
        leaf.target == Target::Visibility
    }

    fn build(
        &self,
        ctx: &mut QueryContext<'_>,
        leaf: &LeafCriterion,
    ) -> Result<Fragment, InternalError> {
        if leaf.op != Operator::Eq {
            return Err(CriterionError::unsupported_operator(leaf.op, &leaf.target).into());
        }
        let Value::Bool(visible) = leaf.value.to_scalar() else {
            return Err(
                CriterionError::invalid_value(&leaf.target, "expected a boolean").into(),
            );
        };

        Ok(tree_subselect(ctx, !visible, |_, alias| {
            Fragment::new(format!("{alias}.{} = 0", tree_node::IS_INVISIBLE))
        }))
    }
}

///
/// MainNodeHandler
/// Comparisons on a column of the entity's main location.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MainNodeHandler {
    name: &'static str,
    target: Target,
    column: &'static str,
}

impl MainNodeHandler {
    #[must_use]
    pub const fn depth() -> Self {
        Self {
            name: "depth",
            target: Target::Depth,
            column: tree_node::DEPTH,
        }
    }

    #[must_use]
    pub const fn priority() -> Self {
        Self {
            name: "location_priority",
            target: Target::LocationPriority,
            column: tree_node::PRIORITY,
        }
    }
}

impl CriterionHandler for MainNodeHandler {
    fn name(&self) -> &'static str {
        self.name
    }

    fn accepts(&self, leaf: &LeafCriterion) -> bool {
        leaf.target == self.target
    }

    fn build(
        &self,
        ctx: &mut QueryContext<'_>,
        leaf: &LeafCriterion,
    ) -> Result<Fragment, InternalError> {
        if matches!(leaf.op, Operator::Like | Operator::Contains) {
            return Err(CriterionError::unsupported_operator(leaf.op, &leaf.target).into());
        }
        SharedJoin::MainNode.ensure(ctx);
        let column = SharedJoin::MainNode.column(self.column);

        compare(ctx, &column, leaf.op, &leaf.value, |v| v).ok_or_else(|| {
            CriterionError::unsupported_operator(leaf.op, &leaf.target).into()
        })
    }
}
