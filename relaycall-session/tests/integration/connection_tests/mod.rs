mod test_candidate_order_independence;
